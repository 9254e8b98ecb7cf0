struct Widget;

#[locator::singleton]
impl Widget {
    fn new() -> Self {
        Widget
    }
}

fn main() {
    let _ = Widget;
}
