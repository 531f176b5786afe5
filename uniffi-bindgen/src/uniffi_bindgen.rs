//! Generates the Swift and Kotlin bindings for `crumbkit-core`.

fn main() {
    uniffi::uniffi_bindgen_main();
}
