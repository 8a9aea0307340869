use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use projkit::{Crs, CrsParams, Pipeline, Point};

fn crs(def: &str) -> Arc<Crs> {
    Arc::new(Crs::from_definition(def).unwrap())
}

fn lon_lat_grid(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            Point::new(10.0 + t * 10.0, 45.0 + t * 10.0)
        })
        .collect()
}

fn bench_transform_throughput(c: &mut Criterion) {
    let n = 100_000_usize;
    let grid = lon_lat_grid(n);

    let cases = [
        ("wgs84_to_utm33", "EPSG:4326", "EPSG:32633"),
        ("wgs84_to_webmerc", "EPSG:4326", "EPSG:3857"),
        (
            "wgs84_to_laea_europe",
            "EPSG:4326",
            "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 +ellps=GRS80 +units=m",
        ),
        (
            "osgb36_7param",
            "EPSG:4326",
            "+proj=tmerc +lat_0=49 +lon_0=-2 +k=0.9996012717 +x_0=400000 +y_0=-100000 \
             +datum=OSGB36 +units=m",
        ),
    ];

    for (name, src, dst) in cases {
        let pipe = Pipeline::new(crs(src), crs(dst));
        let mut points = grid.clone();
        c.bench_function(&format!("{name}_100k"), |b| {
            b.iter(|| {
                points.copy_from_slice(&grid);
                pipe.transform_batch(black_box(&mut points)).unwrap();
            });
        });
    }
}

fn bench_inverse_utm(c: &mut Criterion) {
    let pipe = Pipeline::new(crs("EPSG:4326"), crs("EPSG:32633"));
    let projected: Vec<Point> = (0..10_000)
        .map(|i| Point::new(300_000.0 + i as f64 * 40.0, 5_000_000.0 + i as f64 * 200.0))
        .collect();

    c.bench_function("utm33_inverse_10k", |b| {
        b.iter(|| {
            for p in &projected {
                black_box(pipe.transform_inv(*p).unwrap());
            }
        });
    });
}

fn bench_parse(c: &mut Criterion) {
    let wkt = r#"PROJCS["RGF93 / Lambert-93",GEOGCS["RGF93",DATUM["Reseau_Geodesique_Francais_1993",SPHEROID["GRS 1980",6378137,298.257222101],TOWGS84[0,0,0,0,0,0,0]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]],PROJECTION["Lambert_Conformal_Conic_2SP"],PARAMETER["standard_parallel_1",49],PARAMETER["standard_parallel_2",44],PARAMETER["latitude_of_origin",46.5],PARAMETER["central_meridian",3],PARAMETER["false_easting",700000],PARAMETER["false_northing",6600000],UNIT["metre",1]]"#;
    c.bench_function("parse_wkt_lambert93", |b| {
        b.iter(|| black_box(CrsParams::parse(black_box(wkt)).unwrap()));
    });
    c.bench_function("parse_proj_string_utm", |b| {
        b.iter(|| {
            black_box(CrsParams::parse(black_box("+proj=utm +zone=33 +ellps=WGS84 +datum=WGS84 +units=m")).unwrap())
        });
    });
}

criterion_group!(benches, bench_transform_throughput, bench_inverse_utm, bench_parse);
criterion_main!(benches);
