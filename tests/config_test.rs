//! Input files: parsing, strict values, and model construction from disk.

use std::io::Write;

use les_rs::config::{ConfigError, Input};
use les_rs::parallel::LocalWorld;
use les_rs::thermo::Thermo;
use les_rs::{Error, Model};
use tempfile::NamedTempFile;

const CASE: &str = "\
# slope flow case
[master]
npx = 2
npy = 2
wallclocklimit = 1.5

[grid]
itot = 16
jtot = 8
ktot = 8
xsize = 1600
ysize = 800
zsize = 400
swspatialorder = 4
utrans = 0

[thermo]
swthermo = slope
alpha = 0.1
n2 = 1e-4

[fields]
svisc = 1e-5
visc = 1e-5
";

fn write_case(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_model_from_file() {
    let file = write_case(CASE);
    let path = file.path().to_path_buf();

    let results = LocalWorld::run(4, |comm| {
        let input = Input::from_file(&path).unwrap();
        let mut model = Model::from_input(&input, comm).unwrap();
        model.exec_thermo().unwrap();
        let stats = model.tendency_stats().unwrap();
        (
            model.thermo.name(),
            model.prognostic_variables(),
            (model.grid.imax, model.grid.jmax),
            input.unused_items(),
            stats.len(),
        )
    });

    for (name, vars, local, unused, nstats) in results {
        assert_eq!(name, "slope");
        assert_eq!(vars, vec!["b".to_string()]);
        assert_eq!(local, (8, 4));
        assert_eq!(unused, vec![("fields".to_string(), "visc".to_string())]);
        // ut, vt, wt and bt
        assert_eq!(nstats, 4);
    }
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Input::from_file(dir.path().join("absent.ini")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_malformed_line_reports_line_number() {
    let err = "[grid]\nitot = 16\nthis is not an item\n"
        .parse::<Input>()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse { line: 3, .. }));
}

#[test]
fn test_unparsable_value_fails_configuration() {
    let text = CASE.replace("alpha = 0.1", "alpha = steep");
    let results = LocalWorld::run(4, |comm| {
        let input: Input = text.parse().unwrap();
        matches!(
            Model::from_input(&input, comm),
            Err(Error::Configuration(ConfigError::InvalidValue { .. }))
        )
    });
    assert_eq!(results, vec![true; 4]);
}

#[test]
fn test_unknown_thermo_switch() {
    let text = CASE.replace("swthermo = slope", "swthermo = moist");
    let results = LocalWorld::run(4, |comm| {
        let input: Input = text.parse().unwrap();
        matches!(
            Model::from_input(&input, comm),
            Err(Error::Configuration(ConfigError::InvalidValue { .. }))
        )
    });
    assert_eq!(results, vec![true; 4]);
}
