use catalog::keyword::filter_courses;
use catalog::Course;
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_filter(c: &mut Criterion) {
    let courses: Vec<Course> = (0..500)
        .map(|i| {
            let mut course = Course::listed(format!("Course {i}"), format!("https://x/{i}"), "");
            course.description = format!("Module {i} covers python, sql and statistics");
            course
        })
        .collect();
    c.bench_function("filter_500_courses", |b| b.iter(|| filter_courses(&courses, "Python")));
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
