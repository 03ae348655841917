use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dynarray::{dynarray, DynArray};

fn dyn_array_new(c: &mut Criterion) {
    c.bench_function("DynArray::new", |b| b.iter(|| {
        DynArray::<u32>::new()
    }));
    c.bench_function("Vec::new", |b| b.iter(|| {
        Vec::<u32>::new()
    }));
    c.bench_function("DynArray::with_capacity(64)", |b| b.iter(|| {
        DynArray::<u32>::with_capacity(64)
    }));
    c.bench_function("Vec::with_capacity(64)", |b| b.iter(|| {
        Vec::<u32>::with_capacity(64)
    }));
}

fn dyn_array_reserve(c: &mut Criterion) {
    c.bench_function("DynArray::reserve", |b| b.iter(|| {
        let mut arr = DynArray::<u32>::new();
        arr.reserve(32);
        arr
    }));
    c.bench_function("Vec::reserve", |b| b.iter(|| {
        let mut arr = Vec::<u32>::new();
        arr.reserve(32);
        arr
    }));
}

fn dyn_array_push(c: &mut Criterion) {
    c.bench_function("DynArray::push(100) no reserve", |b| b.iter(|| {
        let mut arr = DynArray::<u32>::new();
        for i in 0..100 {
            arr.push(i);
        }
        arr
    }));
    c.bench_function("DynArray::push(100) reserve", |b| b.iter(|| {
        let mut arr = DynArray::<u32>::new();
        arr.reserve(100);
        for i in 0..100 {
            arr.push(i);
        }
        arr
    }));

    c.bench_function("Vec::push(100) no reserve", |b| b.iter(|| {
        let mut arr = Vec::<u32>::new();
        for i in 0..100 {
            arr.push(i);
        }
        arr
    }));
    c.bench_function("Vec::push(100) reserve", |b| b.iter(|| {
        let mut arr = Vec::<u32>::new();
        arr.reserve(100);
        for i in 0..100 {
            arr.push(i);
        }
        arr
    }));
}

fn dyn_array_index(c: &mut Criterion) {
    let arr = dynarray![5; 100];
    c.bench_function("DynArray::index(100)", |b| b.iter(|| {
        for i in 0..100 {
            black_box(arr[i]);
        }
    }));

    let vbuf = vec![5; 100];
    c.bench_function("Vec::index(100)", |b| b.iter(|| {
        for i in 0..100 {
            black_box(vbuf[i]);
        }
    }));
}

criterion_group!(dyn_array,
    dyn_array_new,
    dyn_array_reserve,
    dyn_array_push,
    dyn_array_index
);
criterion_main!(dyn_array);
