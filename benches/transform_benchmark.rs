//! Benchmarks for table font sizing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rowsize::{Document, Transformer};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Create a question bank with `questions` tables of one question, four
/// options and one solution each.
fn create_test_docx(questions: usize) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#).unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#).unwrap();

        let row = |label: &str, text: &str| {
            format!(
                r#"<w:tr><w:tc><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">{} </w:t></w:r><w:r><w:t>continued</w:t></w:r></w:p></w:tc></w:tr>"#,
                label, text
            )
        };

        let mut body = String::new();
        for i in 0..questions {
            body.push_str("<w:tbl>");
            body.push_str(&row("Question", &format!("Question number {}", i)));
            for option in ["A", "B", "C", "D"] {
                body.push_str(&row("Option", option));
            }
            body.push_str(&row("Solution", "Worked solution"));
            body.push_str("</w:tbl><w:p/>");
        }

        zip.start_file("word/document.xml", options).unwrap();
        write!(
            zip,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{}</w:body>
</w:document>"#,
            body
        )
        .unwrap();

        zip.finish().unwrap();
    }
    buffer
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for size in [10, 100, 500].iter() {
        let data = create_test_docx(*size);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("questions", size), &data, |b, data| {
            b.iter(|| Document::from_bytes(black_box(data)).unwrap())
        });
    }

    group.finish();
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    let transformer = Transformer::default();

    for size in [10, 100, 500].iter() {
        let data = create_test_docx(*size);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("questions", size), &data, |b, data| {
            b.iter(|| transformer.transform(black_box(data)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load, bench_transform);
criterion_main!(benches);
