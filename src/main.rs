fn main() {
    grabitar_lib::run()
}
