use schiller::multiproblem::MultiProblem;
use schiller::settings::{self};

fn main() {
    let settings = settings::load_config().unwrap();
    let mut multiproblem = MultiProblem::new(None, Some(settings));

    multiproblem.solve().unwrap();
    multiproblem.writeup();
}
