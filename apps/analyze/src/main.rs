fn main() {
	chanlun::init_logging();

	let mut args = std::env::args().skip(1);
	let Some(path) = args.next() else {
		eprintln!("usage: analyze <bars.csv> [symbol]");
		std::process::exit(2);
	};
	let symbol = args.next().unwrap_or_else(|| "UNKNOWN".to_string());

	match run(&path, &symbol) {
		Ok(json) => println!("{json}"),
		Err(e) => {
			eprintln!("analyze failed: {e}");
			std::process::exit(1);
		}
	}
}

fn run(path: &str, symbol: &str) -> Result<String, Box<dyn std::error::Error>> {
	let bars = chanlun::load_raw_bars(path, symbol)?;
	let analyzer = chanlun::ChanAnalyzer::analyze(bars)?;
	Ok(serde_json::to_string_pretty(&analyzer.export())?)
}
