mod board_app;
mod commit;
mod config;
mod input;

fn main() {
    board_app::boot();
}
