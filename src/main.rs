use bees::error::AppResult;

fn main() -> AppResult<()> {
    bees::run()
}
