use timeslider::error::AppResult;

fn main() -> AppResult<()> {
    timeslider::run()
}
