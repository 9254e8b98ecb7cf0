struct Widget;

#[locator::singleton]
impl Widget {
    #[instance]
    fn new(&self) -> Self {
        Widget
    }
}

fn main() {
    let _ = Widget;
}
