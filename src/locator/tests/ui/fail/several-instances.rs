struct Widget;

#[locator::singleton]
impl Widget {
    #[instance]
    fn new() -> Self {
        Widget
    }

    #[instance]
    fn other() -> Self {
        Widget
    }
}

fn main() {
    let _ = Widget;
}
