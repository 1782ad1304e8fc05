//! 模型输出 JSON 提取性能基准测试
//!
//! 测试覆盖：
//! - 纯 JSON 与代码块包裹的输出
//! - 前后夹杂说明文字的输出
//! - 需要宽松修复的输出（尾随逗号）
//! - 不同正文长度下的性能曲线

use content_engine::{extract_json_object, extract_json_value, parse_lenient};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;

/// 构造单个难度的模型输出 JSON
fn difficulty_json(paragraphs: usize) -> String {
    let content = (0..paragraphs)
        .map(|i| format!("Paragraph {} explains the topic with {{braces}} and \\\"quotes\\\".", i))
        .collect::<Vec<_>>()
        .join("\\n\\n");

    json!({
        "content_easy": content,
        "questions_easy": {
            "mcq": [
                {"question": "What is 2 + 2?", "options": ["3", "4", "5", "6"], "answer": "4"}
            ],
            "short": [
                {"question": "Define energy.", "answer": "The capacity to do work."}
            ]
        }
    })
    .to_string()
}

fn fenced(json: &str) -> String {
    format!("```json\n{}\n```", json)
}

fn noisy(json: &str) -> String {
    format!(
        "Sure! Here is the generated content for your module:\n\n{}\n\nLet me know if you need changes.",
        json
    )
}

/// 带尾随逗号的题目数组
fn trailing_comma_array(count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| format!(r#"{{"question": "Q{}", "answer": "A{}",}}"#, i, i))
        .collect();
    format!("```json\n[{},]\n```", items.join(",\n"))
}

// ============================================================================
// 基准测试函数
// ============================================================================

fn bench_extract_object(c: &mut Criterion) {
    let raw = difficulty_json(5);
    let inputs = [
        ("plain", raw.clone()),
        ("fenced", fenced(&raw)),
        ("noisy", noisy(&raw)),
    ];

    let mut group = c.benchmark_group("extract_json_object");
    for (name, input) in inputs.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| black_box(extract_json_object(black_box(input))))
        });
    }
    group.finish();
}

/// 不同正文长度下的提取基准
fn bench_content_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_by_size");

    for paragraphs in [1, 10, 50, 200].iter() {
        let input = noisy(&difficulty_json(*paragraphs));
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &input, |b, input| {
            b.iter(|| black_box(extract_json_object(black_box(input))))
        });
    }
    group.finish();
}

fn bench_lenient_repair(c: &mut Criterion) {
    let valid = r#"{"a": [1, 2, 3], "b": {"c": "d"}}"#;
    let broken = r#"{"a": [1, 2, 3,], "b": {"c": "d",},}"#;

    let mut group = c.benchmark_group("parse_lenient");
    group.bench_function("valid", |b| b.iter(|| black_box(parse_lenient(black_box(valid)))));
    group.bench_function("trailing_commas", |b| {
        b.iter(|| black_box(parse_lenient(black_box(broken))))
    });
    group.finish();
}

fn bench_extract_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_json_value");

    for count in [5, 30, 100].iter() {
        let input = trailing_comma_array(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| black_box(extract_json_value(black_box(input))))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_extract_object,
    bench_content_size,
    bench_lenient_repair,
    bench_extract_array,
);

criterion_main!(benches);
