fn main() -> std::io::Result<()> {
    timelog_sync::run()
}
