mod command;
mod course;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
