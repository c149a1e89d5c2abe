use alpha_tag::hashing::{hash_term, hash_term_with, HashConfig};
use alpha_tag::name::Name;
use alpha_tag::parser::parse;
use alpha_tag::util::open_map::OpenMap;
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{thread_rng, Rng};

const CORPUS: &str = "let f : t -> t = fn x:a. x in
let g : t -> t = fn x:a. f x in
let h : t -> t = fn x:a. g f x in
let r : t -> t = fn x:a. r f x in
let q : t -> t -> z = fn x:a. fn y:a. (f x) (f y);
";

/// Generate a random chain of `len` definitions, each a lambda applying earlier definitions
fn random_program<R: Rng>(rng: &mut R, len: usize) -> String {
    let mut src = String::new();
    for i in 0..len {
        src.push_str(&format!("let d{} : t -> t = fn x:a. ", i));
        let args = rng.gen_range(1, 6);
        for _ in 0..args {
            if i == 0 || rng.gen::<bool>() {
                src.push_str("x ");
            } else {
                src.push_str(&format!("d{} ", rng.gen_range(0, i)));
            }
        }
        src.push_str(if i + 1 == len { ";" } else { "in\n" });
    }
    src
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("parse corpus", |b| {
        b.iter(|| parse(CORPUS).unwrap().0.len())
    });

    c.bench_function("hash corpus", |b| {
        let (ast, root) = parse(CORPUS).unwrap();
        b.iter(|| {
            let mut ast = ast.clone();
            hash_term(&mut ast, root);
            ast[root].tag()
        })
    });

    c.bench_function("hash random program", |b| {
        let mut rng = thread_rng();
        let src = random_program(&mut rng, 200);
        let (ast, root) = parse(&src).unwrap();
        b.iter(|| {
            let mut ast = ast.clone();
            hash_term(&mut ast, root);
            ast[root].tag()
        })
    });

    c.bench_function("hash random program with binding positions", |b| {
        let mut rng = thread_rng();
        let src = random_program(&mut rng, 200);
        let (ast, root) = parse(&src).unwrap();
        let config = HashConfig::default().with_binding_positions(true);
        b.iter(|| {
            let mut ast = ast.clone();
            hash_term_with(&mut ast, root, &config);
            ast[root].tag()
        })
    });

    c.bench_function("open map churn", |b| {
        let mut rng = thread_rng();
        let names: Vec<Name> = (0..256)
            .map(|_| Name::from(format!("v{}", rng.gen::<u32>()).as_str()))
            .collect();
        b.iter(|| {
            let mut map = OpenMap::new();
            for (ix, name) in names.iter().enumerate() {
                map.add(name.clone(), ix);
            }
            for name in names.iter().step_by(2) {
                map.remove(name);
            }
            map.len()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
