use eldd::{ElfExtractor, SearchPaths, Walker, render_listing};
use std::env;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        let program = args.first().map(String::as_str).unwrap_or("eldd");
        eprintln!("{program}: missing file arguments");
        return ExitCode::FAILURE;
    }

    let search = SearchPaths::from_env_list(env::var("LD_LIBRARY_PATH").ok().as_deref());
    let extractor = ElfExtractor;
    let with_headers = args.len() > 2;
    for path in &args[1..] {
        if with_headers {
            println!("{path}:");
        }
        // Each root gets a fresh traversal; roots share no state.
        let graph = Walker::new(&extractor, &search).walk(Path::new(path));
        print!("{}", render_listing(&graph, &search));
    }
    ExitCode::SUCCESS
}
