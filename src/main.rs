fn main() {
    game_store_lib::run()
}
