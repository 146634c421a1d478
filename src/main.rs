fn main() {
    if let Err(err) = garden_eye_viewer_lib::run() {
        log::error!("garden-eye-viewer failed: {err:#}");
        eprintln!("garden-eye-viewer failed: {err:#}");
        std::process::exit(1);
    }
}
