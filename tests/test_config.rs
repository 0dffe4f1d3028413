use std::{env::temp_dir, fs};

use imap_migrate::config::{Error, MigrationConfig};

#[test]
fn test_config_from_path() {
    let path = temp_dir().join("imap-migrate-test-config.txt");
    fs::write(
        &path,
        concat!(
            "debug=true\n",
            "imapA.test,user@a,pwA;imapB.test,user@b,pwB\n",
            "imapC.test,user@c,pwC;imapD.test:1143,user@d,pwD\n",
        ),
    )
    .unwrap();

    let config = MigrationConfig::from_path(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert!(config.debug);
    assert_eq!(2, config.pairs.len());

    let pair = &config.pairs[0];
    assert_eq!("imapA.test", pair.source.server);
    assert_eq!("user@a", pair.source.email);
    assert_eq!("pwA", pair.source.password);
    assert_eq!("imapB.test", pair.destination.server);
    assert_eq!(993, pair.destination.port());

    let pair = &config.pairs[1];
    assert_eq!("imapD.test", pair.destination.host());
    assert_eq!(1143, pair.destination.port());
}

#[test]
fn test_config_from_missing_path() {
    let err = MigrationConfig::from_path(temp_dir().join("imap-migrate-no-such-file")).unwrap_err();
    assert!(matches!(err, Error::ReadConfigFileError(_, _)));
}

#[test]
fn test_config_reports_malformed_lines() {
    let err = MigrationConfig::parse("debug=false\nimapA.test,user@a,pwA").unwrap_err();
    assert!(matches!(err, Error::ParsePairSeparatorError(2)));

    let err = MigrationConfig::parse("imapA.test,user@a;imapB.test,user@b,pwB").unwrap_err();
    assert!(matches!(err, Error::ParseAccountFieldsError(1, 2)));
}
