mod cli;
mod io;

fn main() {
    cli::Entry::main();
}
