//! Benchmarks for slidefill slide parsing and substitution.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use slidefill::fill::substitute;
use slidefill::pptx::Slide;
use slidefill::{Item, TokenMap};

/// Creates a slide part with the given number of tokenized text boxes.
fn create_test_slide(shape_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#,
    );

    for i in 0..shape_count {
        let id = i + 2;
        xml.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="0" y="{y}"/><a:ext cx="5000" cy="400"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US" sz="1800"/><a:t>{{{{TITLE}}}} line {i}: {{{{FIELD{field}}}}}</a:t></a:r></a:p></p:txBody></p:sp>"#,
            y = i * 400,
            field = i % 10,
        ));
    }

    xml.push_str("</p:spTree></p:cSld></p:sld>");
    xml
}

fn create_tokens() -> TokenMap {
    let mut pairs = vec![("title".to_string(), "Quarterly Review".to_string())];
    pairs.extend((0..10).map(|i| (format!("field{i}"), format!("value number {i}"))));
    TokenMap::from_item(&Item::from_pairs(pairs))
}

/// Benchmark splitting a slide part into shapes.
fn bench_slide_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("slide_parsing");

    for shape_count in [10, 100, 500].iter() {
        let xml = create_test_slide(*shape_count);
        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::new("shapes", shape_count), &xml, |b, xml| {
            b.iter(|| {
                let _ = Slide::from_xml("ppt/slides/slide1.xml", black_box(xml));
            });
        });
    }

    group.finish();
}

/// Benchmark token substitution and text write-back over a whole slide.
fn bench_slide_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("slide_fill");
    let tokens = create_tokens();

    for shape_count in [10, 100, 500].iter() {
        let xml = create_test_slide(*shape_count);
        let slide = Slide::from_xml("ppt/slides/slide1.xml", &xml).unwrap();

        group.bench_with_input(BenchmarkId::new("shapes", shape_count), &slide, |b, slide| {
            b.iter(|| {
                let mut slide = slide.clone();
                for index in 0..slide.shape_count() {
                    let updated = slide
                        .shape(index)
                        .and_then(|shape| shape.text())
                        .and_then(|text| substitute(text, black_box(&tokens)));
                    if let Some(text) = updated {
                        let _ = slide.set_shape_text(index, &text);
                    }
                }
                slide.to_xml()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_slide_parsing, bench_slide_fill);
criterion_main!(benches);
