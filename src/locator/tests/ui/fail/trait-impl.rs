struct Widget;

#[locator::singleton]
impl Default for Widget {
    #[instance]
    fn default() -> Self {
        Widget
    }
}

fn main() {
    let _ = Widget;
}
