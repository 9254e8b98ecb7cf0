#[locator::singleton]
struct Widget;

fn main() {}
