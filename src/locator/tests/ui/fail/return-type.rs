struct Widget;

#[locator::singleton]
impl Widget {
    #[instance]
    fn new() -> u32 {
        0
    }
}

fn main() {
    let _ = Widget;
}
