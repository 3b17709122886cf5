use shadow_rs::ShadowBuilder;

fn main() {
    // Embeds git and build metadata used by `vcard-rs --version`
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
