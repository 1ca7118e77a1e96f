use log::error;

fn main() {
    env_logger::init();

    if let Err(e) = port_ais::get_arg().and_then(port_ais::run) {
        error!("{e:#}");
        std::process::exit(-1);
    }
}
