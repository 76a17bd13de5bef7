use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = civ_pipeline::Args::parse();

	civ_pipeline::run(args).await
}
