use super::*;
use std::path::PathBuf;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_decode_auth_valid() {
    // base64("alice:s3cret")
    let cred = decode_auth("YWxpY2U6czNjcmV0").unwrap();
    assert_eq!(cred.username, "alice");
    assert_eq!(cred.password, "s3cret");
}

#[test]
fn test_decode_auth_splits_on_first_colon() {
    // base64("bot:a:b:c")
    let cred = decode_auth("Ym90OmE6Yjpj").unwrap();
    assert_eq!(cred.username, "bot");
    assert_eq!(cred.password, "a:b:c");
}

#[test]
fn test_decode_auth_without_colon_fails() {
    // base64("alice")
    let result = decode_auth("YWxpY2U=");
    assert!(matches!(
        result,
        Err(HelmRepoError::CredentialDecode { .. })
    ));
}

#[test]
fn test_decode_auth_invalid_base64_fails() {
    let result = decode_auth("not base64!!");
    assert!(matches!(
        result,
        Err(HelmRepoError::CredentialDecode { .. })
    ));
}

#[test]
fn test_decode_auth_empty_fails() {
    assert!(decode_auth("").is_err());
}

#[test]
fn test_auth_entry_without_auth_fails() {
    let entry = AuthEntry { auth: None };
    assert!(matches!(
        entry.credential(),
        Err(HelmRepoError::CredentialDecode { .. })
    ));
}

#[test]
fn test_helm_config_load() {
    let temp_dir = tempdir().unwrap();
    let path = write(
        temp_dir.path(),
        "config.json",
        r#"{"auths":{"registry.example":{"auth":"YWxpY2U6czNjcmV0"}}}"#,
    );

    let config = HelmConfig::load(&path).unwrap();
    let entry = config.auths.get("registry.example").unwrap();
    assert_eq!(entry.credential().unwrap(), Credential::new("alice", "s3cret"));
}

#[test]
fn test_helm_config_load_missing_file_fails() {
    let temp_dir = tempdir().unwrap();
    let result = HelmConfig::load(&temp_dir.path().join("nope.json"));
    assert!(matches!(result, Err(HelmRepoError::Config { .. })));
}

#[test]
fn test_helm_config_load_malformed_fails() {
    let temp_dir = tempdir().unwrap();
    let path = write(temp_dir.path(), "config.json", "{ not json");

    match HelmConfig::load(&path) {
        Err(HelmRepoError::Config { path: Some(p), .. }) => assert!(p.ends_with("config.json")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_docker_config_load_all_sections() {
    let temp_dir = tempdir().unwrap();
    let path = write(
        temp_dir.path(),
        "config.json",
        r#"{
            "auths": {"registry.example": {"auth": "YWxpY2U6czNjcmV0"}, "ghcr.io": {}},
            "credsStore": "desktop",
            "credHelpers": {"gcr.io": "gcloud"},
            "currentContext": "default"
        }"#,
    );

    let config = DockerConfig::load(&path).unwrap();
    assert_eq!(config.creds_store.as_deref(), Some("desktop"));
    assert_eq!(config.cred_helpers.get("gcr.io").map(String::as_str), Some("gcloud"));
    assert_eq!(config.auths.len(), 2);
    assert_eq!(config.auths["ghcr.io"].auth, None);
}

#[test]
fn test_docker_config_empty_object() {
    let config: DockerConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, DockerConfig::default());
    assert_eq!(config.helper_for("registry.example"), None);
}

#[test]
fn test_helper_for_prefers_host_override() {
    let config: DockerConfig = serde_json::from_str(
        r#"{"credsStore":"desktop","credHelpers":{"registry.example":"ecr-login"}}"#,
    )
    .unwrap();

    assert_eq!(config.helper_for("registry.example"), Some("ecr-login"));
    assert_eq!(config.helper_for("other.example"), Some("desktop"));
}

#[test]
fn test_helper_for_ignores_empty_names() {
    let config: DockerConfig =
        serde_json::from_str(r#"{"credsStore":"","credHelpers":{"registry.example":""}}"#)
            .unwrap();

    assert_eq!(config.helper_for("registry.example"), None);
}

#[test]
fn test_store_paths_env_overrides() {
    let paths = StorePaths::resolve(
        Some("/opt/helm".into()),
        Some("/opt/docker".into()),
        Some(PathBuf::from("/home/me/.config")),
        Some(PathBuf::from("/home/me")),
    );

    assert_eq!(
        paths.helm,
        Some(PathBuf::from("/opt/helm/registry/config.json"))
    );
    assert_eq!(paths.docker, Some(PathBuf::from("/opt/docker/config.json")));
}

#[test]
fn test_store_paths_defaults() {
    let paths = StorePaths::resolve(
        None,
        None,
        Some(PathBuf::from("/home/me/.config")),
        Some(PathBuf::from("/home/me")),
    );

    assert_eq!(
        paths.helm,
        Some(PathBuf::from("/home/me/.config/helm/registry/config.json"))
    );
    assert_eq!(
        paths.docker,
        Some(PathBuf::from("/home/me/.docker/config.json"))
    );
}

#[test]
fn test_store_paths_empty_env_is_unset() {
    let paths = StorePaths::resolve(
        Some("".into()),
        Some("".into()),
        Some(PathBuf::from("/cfg")),
        Some(PathBuf::from("/home")),
    );

    assert_eq!(paths.helm, Some(PathBuf::from("/cfg/helm/registry/config.json")));
    assert_eq!(paths.docker, Some(PathBuf::from("/home/.docker/config.json")));
}

#[test]
fn test_store_paths_without_directories() {
    let paths = StorePaths::resolve(None, None, None, None);
    assert_eq!(paths, StorePaths::default());
}
