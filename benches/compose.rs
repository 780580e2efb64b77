use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::Value;

use displayer::{Displayer, Item, Layout, TableConfig};

fn compose_dashboard(rows: usize) -> Value {
    let mut displayer = Displayer::new();
    displayer.set_title("Dashboard").expect("title");
    displayer.add_module("overview").expect("module");

    let grid = displayer
        .add_master_layout(Layout::vertical([4, 4, 4]).expect("layout"))
        .expect("master");
    for column in 0..3 {
        displayer
            .add_display_item(Item::text(format!("panel {column}")), column, None, Some(grid))
            .expect("item");
    }

    let tabs = displayer
        .add_master_layout(Layout::tabs(["Hosts", "Events"]).expect("tabs"))
        .expect("master");
    let hosts = displayer
        .add_slave_layout(
            Layout::table(["Host", "Status"])
                .expect("table")
                .with_table_config(TableConfig::interactive("hosts", vec![0]).expect("config"))
                .expect("config"),
            0,
            Some(tabs),
        )
        .expect("slave");
    for line in 0..rows {
        displayer
            .add_display_item(Item::text(format!("host-{line}")), 0, Some(line), Some(hosts))
            .expect("cell");
        displayer
            .add_display_item(
                Item::table_cell_badge("up", Some("success".into())),
                1,
                Some(line),
                Some(hosts),
            )
            .expect("cell");
    }

    displayer.display(false).expect("display")
}

fn compose_dashboard_bench(c: &mut Criterion) {
    c.bench_function("compose_dashboard_200_rows", |b| {
        b.iter(|| compose_dashboard(black_box(200)));
    });
}

criterion_group!(benches, compose_dashboard_bench);
criterion_main!(benches);
