use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sigforge_parser::{merge, parse_line, Lexer};

fn bench_lexer(c: &mut Criterion) {
    let line = "core.Object.setProperty(name:str,value:Variant=Variant())->bool";

    c.bench_function("lex_line", |b| {
        b.iter(|| Lexer::new(black_box(line)).tokenize().unwrap());
    });
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_line");

    let lines = [
        ("simple", "sumThree(a0:int,a1:int,a2:int)->int"),
        (
            "generic",
            "core.Store.insert(items:std.map[std.string,std.vector[int]],flag:bool=false)",
        ),
        (
            "variadic",
            "2:core.Object.call(name:str,/,arg__1:...,*,flags:core.Flags=core.Flags.None,kwds:...)",
        ),
    ];

    for (name, line) in lines {
        group.bench_with_input(BenchmarkId::new("kind", name), &line, |b, line| {
            b.iter(|| parse_line(black_box(line)).unwrap());
        });
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let lines: Vec<String> = (0..32)
        .rev()
        .map(|i| format!("{}:core.Object.f(x:int,y:{})", i, if i % 2 == 0 { "int" } else { "str" }))
        .collect();

    c.bench_function("merge_group_32", |b| {
        b.iter(|| merge(black_box(&lines)));
    });
}

criterion_group!(benches, bench_lexer, bench_parse, bench_merge);
criterion_main!(benches);
