//! The WGSL sources shipped with the renderer must parse and validate.

use drizzle::render::{BACKGROUND_SHADER, STREAK_SHADER};

/// Validates WGSL code using naga.
fn validate_wgsl(code: &str) -> Result<naga::Module, String> {
    let module = naga::front::wgsl::parse_str(code)
        .map_err(|e| format!("WGSL parse error: {:?}", e))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| format!("WGSL validation error: {:?}", e))?;

    Ok(module)
}

fn entry_points(module: &naga::Module) -> Vec<&str> {
    module.entry_points.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn test_streak_shader_validates() {
    let module = validate_wgsl(STREAK_SHADER).expect("streak shader should be valid");
    assert_eq!(entry_points(&module), vec!["vs_main", "fs_main"]);
}

#[test]
fn test_background_shader_validates() {
    let module = validate_wgsl(BACKGROUND_SHADER).expect("background shader should be valid");
    assert_eq!(entry_points(&module), vec!["vs_main", "fs_main"]);
}

#[test]
fn test_uniform_structs_match() {
    // Both pipelines share one bind group, so the declarations must agree.
    let uniforms = |src: &str| {
        let start = src.find("struct Uniforms").expect("Uniforms struct");
        let end = start + src[start..].find("};").expect("struct end");
        src[start..end].to_string()
    };
    assert_eq!(uniforms(STREAK_SHADER), uniforms(BACKGROUND_SHADER));
}

#[test]
fn test_background_shifts_on_both_axes() {
    // Roll moves x and pitch moves y; the background must read the whole offset.
    let fs = &BACKGROUND_SHADER[BACKGROUND_SHADER.find("fn fs_main").expect("fs_main")..];
    assert!(fs.contains("uniforms.background_offset /"));
    assert!(!fs.contains("background_offset.y"));
    assert!(!fs.contains("background_offset.x"));
}
