fn main() {
    emoji_playground::run();
}
