use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use cenascript_core::{lexer::Lexer, parser::Parser, CommandSet};

fn make_script(lines: usize) -> String {
    let mut buf = String::with_capacity(lines * 40);
    buf.push_str("speaker,text,command\n");

    for i in 0..lines {
        match i % 7 {
            0 => buf.push_str(&format!("NARRADOR,\"A long, quiet night {i}\",\n")),
            1 => buf.push_str(&format!("Damiao,Hello world {i},POSE=left\n")),
            2 => buf.push_str(&format!("WAIT,Hold on {i},WAIT=aside;WAIT_HIDE=1\n")),
            3 => buf.push_str(&format!("ACT,Press to knock {i},ACT=knock{i}\n")),
            4 => {
                buf.push_str(&format!("CHOICE,Question {i},\n"));
                buf.push_str(&format!("Yes,\"Sure, why not\",CHOICE_ID=Q{i};CHOICE_OPT=YES;AFF_DAMIAO=1\n"));
                buf.push_str(&format!("No,No way,CHOICE_ID=Q{i};CHOICE_OPT=NO\n"));
                buf.push_str("CHOICE,,\n");
            }
            5 => buf.push_str(&format!("BRANCH,,CHOICE_ID=Q{i};CHOICE_OPT=YES\n")),
            6 => buf.push_str("BRANCH_END,,\n"),
            _ => unreachable!(),
        }
    }
    buf
}

fn bench_full(c: &mut Criterion) {
    let src = make_script(10_000);
    let mut group = c.benchmark_group("parse");
    group.sample_size(10);
    group.bench_function("lex+parse 10k rows", |b| {
        b.iter(|| {
            let tokens = Lexer::new(black_box(&src)).run();
            let _script = Parser::new(black_box(&tokens)).parse();
        })
    });
    group.bench_function("decode commands 10k rows", |b| {
        let tokens = Lexer::new(&src).run();
        let parsed = Parser::new(&tokens).parse();
        b.iter(|| {
            for line in &parsed.script.lines {
                black_box(CommandSet::decode(&line.command));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_full);
criterion_main!(benches);
