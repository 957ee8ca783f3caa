fn main() {
    if let Err(err) = story_graph_report::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
