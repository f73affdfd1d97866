// build.rs
fn main() {
    // Git SHA and build timestamp for `pcstat --version`
    vergen::EmitBuilder::builder()
        .all_build()
        .all_git()
        .emit()
        .expect("Unable to generate build info");
}
