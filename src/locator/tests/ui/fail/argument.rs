struct Widget;

#[locator::singleton]
impl Widget {
    #[instance]
    fn new(seed: u64) -> Self {
        Widget
    }
}

fn main() {
    let _ = Widget;
}
