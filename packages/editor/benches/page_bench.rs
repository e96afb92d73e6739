use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trellis_editor::{calculate_drop_index, Page, Pattern};

fn container() -> Pattern {
    Pattern::new("box", "Box").with_slot("children", true)
}

/// Root with `width` children, each holding `width` grandchildren
fn wide_page(width: usize) -> (Page, Vec<String>) {
    let pattern = container();
    let mut page = Page::new("bench", "Bench", &pattern);
    let root = page.root_id().to_string();
    let mut children = Vec::with_capacity(width);

    for _ in 0..width {
        let child = page.create_element(&pattern);
        for _ in 0..width {
            let grandchild = page.create_element(&pattern);
            page.add_child(&child, &grandchild, None, None).unwrap();
        }
        page.add_child(&root, &child, None, None).unwrap();
        children.push(child);
    }

    (page, children)
}

fn reorder_siblings(c: &mut Criterion) {
    let (mut page, children) = wide_page(50);
    let root = page.root_id().to_string();

    c.bench_function("reorder_siblings", |b| {
        b.iter(|| {
            let index = calculate_drop_index(&page, &children[0], &children[49]).unwrap();
            page.add_child(black_box(&root), &children[0], None, Some(index)).unwrap();
            page.add_child(&root, &children[0], None, Some(0)).unwrap();
        })
    });
}

fn reparent_subtree(c: &mut Criterion) {
    let (mut page, children) = wide_page(50);
    let root = page.root_id().to_string();

    c.bench_function("reparent_subtree", |b| {
        b.iter(|| {
            page.add_child(black_box(&children[1]), &children[0], None, None).unwrap();
            page.add_child(&root, &children[0], None, Some(0)).unwrap();
        })
    });
}

fn ancestor_check(c: &mut Criterion) {
    let (page, children) = wide_page(50);
    let root = page.root_id().to_string();
    let leaf = page.children(&children[49], "children")[49].clone();

    c.bench_function("ancestor_check", |b| {
        b.iter(|| page.is_ancestor_of(black_box(&root), black_box(&leaf)))
    });
}

fn serialize_page(c: &mut Criterion) {
    let (page, _) = wide_page(30);

    c.bench_function("serialize_page", |b| b.iter(|| black_box(&page).to_json().unwrap()));
}

criterion_group!(benches, reorder_siblings, reparent_subtree, ancestor_check, serialize_page);
criterion_main!(benches);
