fn main() -> anyhow::Result<()> {
    mulkit::cli::run_cli()
}
