// Host-side checks on the composite shader source.

const POST_WGSL: &str = include_str!("../shaders/post.wgsl");

fn composite_body() -> &'static str {
    let start = POST_WGSL
        .find("fn fs_composite")
        .expect("composite entry point");
    let rest = &POST_WGSL[start..];
    let end = rest.find("\n}\n").expect("end of composite");
    &rest[..end]
}

#[test]
fn chromatic_split_reads_the_antialiased_image() {
    let body = composite_body();
    assert!(body.contains("filtered(uv + off, texel)"));
    assert!(body.contains("filtered(uv - off, texel)"));
    assert!(!body.contains("sample_src("));
}

#[test]
fn vignette_only_darkens() {
    let body = composite_body();
    assert!(body.contains("rgb = rgb * (1.0 - P.lens.w * falloff)"));
    assert!(!body.contains("mix(rgb, vec3<f32>(1.0 - P.lens.w)"));
}

#[test]
fn stages_run_in_chain_order() {
    let body = composite_body();
    let at = |needle: &str| body.find(needle).expect(needle);
    let aa = at("filtered(uv, texel)");
    let bloom = at("P.toggles.y");
    let ca = at("P.toggles.z");
    let vignette = at("P.toggles.w");
    let noise = at("P.grain.y");
    assert!(aa < bloom && bloom < ca && ca < vignette && vignette < noise);
}
