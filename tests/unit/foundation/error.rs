use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BlockRenderError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        BlockRenderError::asset("x")
            .to_string()
            .contains("asset error:")
    );
    assert!(
        BlockRenderError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        BlockRenderError::render("x")
            .to_string()
            .contains("render error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BlockRenderError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
