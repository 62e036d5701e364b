use super::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use tempfile::{TempDir, tempdir};

// base64("alice:s3cret")
const ALICE: &str = "YWxpY2U6czNjcmV0";
// base64("bob:docker-pass")
const BOB: &str = "Ym9iOmRvY2tlci1wYXNz";

/// Records every helper call and answers from a fixed table.
#[derive(Clone, Default)]
struct FakeHelper {
    calls: Rc<RefCell<Vec<(String, String)>>>,
    answers: HashMap<String, Credential>,
    fail: bool,
}

impl FakeHelper {
    fn answering(helper: &str, credential: Credential) -> Self {
        let mut answers = HashMap::new();
        answers.insert(helper.to_string(), credential);
        Self {
            answers,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl CredentialHelper for FakeHelper {
    fn get(&self, helper: &str, host: &str) -> Result<Option<Credential>> {
        self.calls
            .borrow_mut()
            .push((helper.to_string(), host.to_string()));
        if self.fail {
            return Err(HelmRepoError::helper(helper, "exit status 1"));
        }
        Ok(self.answers.get(helper).cloned())
    }
}

struct Stores {
    _dir: TempDir,
    paths: StorePaths,
}

fn stores(helm: Option<&str>, docker: Option<&str>) -> Stores {
    let dir = tempdir().unwrap();
    let helm_path = dir.path().join("helm").join("config.json");
    let docker_path = dir.path().join("docker").join("config.json");

    if let Some(contents) = helm {
        fs::create_dir_all(helm_path.parent().unwrap()).unwrap();
        fs::write(&helm_path, contents).unwrap();
    }
    if let Some(contents) = docker {
        fs::create_dir_all(docker_path.parent().unwrap()).unwrap();
        fs::write(&docker_path, contents).unwrap();
    }

    Stores {
        _dir: dir,
        paths: StorePaths::new(helm_path, docker_path),
    }
}

fn resolver(stores: &Stores, helper: &FakeHelper) -> CredentialResolver {
    CredentialResolver::with_helper(stores.paths.clone(), Box::new(helper.clone()))
}

#[test]
fn test_helm_store_takes_precedence_over_docker() {
    let stores = stores(
        Some(&format!(r#"{{"auths":{{"registry.example":{{"auth":"{}"}}}}}}"#, ALICE)),
        Some(&format!(
            r#"{{"auths":{{"registry.example":{{"auth":"{}"}}}},"credsStore":"desktop"}}"#,
            BOB
        )),
    );
    let helper = FakeHelper::default();

    let resolved = resolver(&stores, &helper).resolve("registry.example").unwrap();

    assert_eq!(resolved.credential, Credential::new("alice", "s3cret"));
    assert_eq!(resolved.source, CredentialSource::HelmConfig);
    assert!(helper.calls().is_empty());
}

#[test]
fn test_docker_inline_auth_beats_configured_helper() {
    let stores = stores(
        None,
        Some(&format!(
            r#"{{"auths":{{"registry.example":{{"auth":"{}"}}}},"credsStore":"desktop","credHelpers":{{"registry.example":"ecr-login"}}}}"#,
            BOB
        )),
    );
    let helper = FakeHelper::default();

    let resolved = resolver(&stores, &helper).resolve("registry.example").unwrap();

    assert_eq!(resolved.credential, Credential::new("bob", "docker-pass"));
    assert_eq!(resolved.source, CredentialSource::DockerConfig);
    assert!(helper.calls().is_empty());
}

#[test]
fn test_host_specific_helper_used_instead_of_default() {
    let stores = stores(
        None,
        Some(r#"{"credsStore":"desktop","credHelpers":{"registry.example":"ecr-login"}}"#),
    );
    let helper = FakeHelper::answering("ecr-login", Credential::new("AWS", "ecr-token"));

    let resolved = resolver(&stores, &helper).resolve("registry.example").unwrap();

    assert_eq!(resolved.credential, Credential::new("AWS", "ecr-token"));
    assert_eq!(
        resolved.source,
        CredentialSource::Helper("ecr-login".to_string())
    );
    assert_eq!(
        helper.calls(),
        vec![("ecr-login".to_string(), "registry.example".to_string())]
    );
}

#[test]
fn test_default_helper_used_for_unlisted_host() {
    let stores = stores(
        None,
        Some(r#"{"credsStore":"desktop","credHelpers":{"gcr.io":"gcloud"}}"#),
    );
    let helper = FakeHelper::answering("desktop", Credential::new("carol", "pw"));

    let resolved = resolver(&stores, &helper).resolve("registry.example").unwrap();

    assert_eq!(resolved.credential.username, "carol");
    assert_eq!(
        helper.calls(),
        vec![("desktop".to_string(), "registry.example".to_string())]
    );
}

#[test]
fn test_helper_miss_is_credential_not_found() {
    let stores = stores(None, Some(r#"{"credsStore":"desktop"}"#));
    let helper = FakeHelper::default();

    let result = resolver(&stores, &helper).resolve("registry.example");

    assert!(matches!(
        result,
        Err(HelmRepoError::CredentialNotFound { ref host }) if host == "registry.example"
    ));
    assert_eq!(helper.calls().len(), 1);
}

#[test]
fn test_helper_failure_is_fatal() {
    let stores = stores(None, Some(r#"{"credsStore":"desktop"}"#));
    let helper = FakeHelper {
        fail: true,
        ..FakeHelper::default()
    };

    let result = resolver(&stores, &helper).resolve("registry.example");
    assert!(matches!(
        result,
        Err(HelmRepoError::HelperInvocation { .. })
    ));
}

#[test]
fn test_no_stores_is_credential_not_found() {
    let stores = stores(None, None);
    let helper = FakeHelper::default();

    let result = resolver(&stores, &helper).resolve("registry.example");
    assert!(matches!(
        result,
        Err(HelmRepoError::CredentialNotFound { .. })
    ));
    assert!(helper.calls().is_empty());
}

#[test]
fn test_host_absent_everywhere_without_helper() {
    let stores = stores(
        Some(&format!(r#"{{"auths":{{"other.example":{{"auth":"{}"}}}}}}"#, ALICE)),
        Some(&format!(r#"{{"auths":{{"other.example":{{"auth":"{}"}}}}}}"#, BOB)),
    );
    let helper = FakeHelper::default();

    let result = resolver(&stores, &helper).resolve("registry.example");
    assert!(matches!(
        result,
        Err(HelmRepoError::CredentialNotFound { .. })
    ));
}

#[test]
fn test_malformed_helm_store_falls_through_to_docker() {
    let stores = stores(
        Some("{ this is not json"),
        Some(&format!(r#"{{"auths":{{"registry.example":{{"auth":"{}"}}}}}}"#, BOB)),
    );
    let helper = FakeHelper::default();

    let resolved = resolver(&stores, &helper).resolve("registry.example").unwrap();
    assert_eq!(resolved.source, CredentialSource::DockerConfig);
}

#[test]
fn test_undecodable_helm_entry_falls_through_to_docker() {
    // base64("no-colon-here")
    let stores = stores(
        Some(r#"{"auths":{"registry.example":{"auth":"bm8tY29sb24taGVyZQ=="}}}"#),
        Some(&format!(r#"{{"auths":{{"registry.example":{{"auth":"{}"}}}}}}"#, BOB)),
    );
    let helper = FakeHelper::default();

    let resolved = resolver(&stores, &helper).resolve("registry.example").unwrap();
    assert_eq!(resolved.credential, Credential::new("bob", "docker-pass"));
}

#[test]
fn test_empty_docker_entry_falls_through_to_helper() {
    let stores = stores(
        None,
        Some(r#"{"auths":{"registry.example":{}},"credsStore":"desktop"}"#),
    );
    let helper = FakeHelper::answering("desktop", Credential::new("dave", "pw"));

    let resolved = resolver(&stores, &helper).resolve("registry.example").unwrap();
    assert_eq!(
        resolved.source,
        CredentialSource::Helper("desktop".to_string())
    );
}

#[test]
fn test_malformed_docker_store_is_not_found() {
    let stores = stores(None, Some("[1, 2, 3]"));
    let helper = FakeHelper::default();

    let result = resolver(&stores, &helper).resolve("registry.example");
    assert!(matches!(
        result,
        Err(HelmRepoError::CredentialNotFound { .. })
    ));
}

#[test]
fn test_unknown_store_locations_are_skipped() {
    let helper = FakeHelper::default();
    let resolver = CredentialResolver::with_helper(StorePaths::default(), Box::new(helper));

    assert!(resolver.resolve("registry.example").is_err());
    assert_eq!(resolver.paths().helm, None::<PathBuf>);
}

#[test]
fn test_credential_source_display() {
    assert_eq!(CredentialSource::HelmConfig.to_string(), "Helm registry config");
    assert_eq!(CredentialSource::DockerConfig.to_string(), "Docker config");
    assert_eq!(
        CredentialSource::Helper("pass".to_string()).to_string(),
        "credential helper 'pass'"
    );
}
