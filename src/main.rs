use petrel::engine::Engine;
use petrel::uci;

fn main() {
    env_logger::init();

    let mut engine = Engine::new();
    uci::run(&mut engine);
}
