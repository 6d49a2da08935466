fn main() {
    uniffi::generate_scaffolding("src/buoys.udl").expect("failed to generate uniffi scaffolding");
}
