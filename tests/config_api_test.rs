//! Integration tests for config module public API.

use slsctl::config::{
    load_template, CredentialStore, EnvFileSync, Environment, InstanceLoader, MemoryEnvironment,
    Overrides, SourceSpec,
};
use slsctl::remote::StaticOrgResolver;
use slsctl::SlsError;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_instance(dir: &Path, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("serverless.yml"), content).unwrap();
}

#[test]
fn single_instance_workflow() {
    let temp = TempDir::new().unwrap();
    write_instance(
        temp.path(),
        r#"
name: api
component: scf
stage: dev
inputs:
  functionName: ${name}-${stage}
  secret: ${env:TENCENT_SECRET_ID}
  src:
    src: ./code
    dist: ./dist
    exclude:
      - .env
"#,
    );
    fs::write(temp.path().join(".env.dev"), "TENCENT_SECRET_ID=from-file\n").unwrap();

    let mut env = MemoryEnvironment::new();
    let orgs = StaticOrgResolver::new("acme");
    let mut loader = InstanceLoader::new(temp.path(), &mut env, &orgs);
    let instance = loader.load(temp.path()).unwrap();

    assert_eq!(instance.org, "acme");
    assert_eq!(instance.app, "api");
    let inputs = instance.inputs.unwrap();
    assert_eq!(inputs.values["functionName"].as_str(), Some("api-dev"));
    assert_eq!(inputs.values["secret"].as_str(), Some("from-file"));
    match inputs.src {
        Some(SourceSpec::Structured { src, dist, extra }) => {
            assert_eq!(src, Some(temp.path().join("code")));
            assert_eq!(dist, Some(temp.path().join("dist")));
            assert!(extra.contains_key("exclude"));
        }
        other => panic!("unexpected src: {:?}", other),
    }

    // Credentials were applied to the environment and persisted.
    assert_eq!(env.get("TENCENT_SECRET_ID").as_deref(), Some("from-file"));
    let persisted = fs::read_to_string(temp.path().join(".env")).unwrap();
    assert_eq!(persisted, "TENCENT_SECRET_ID=from-file\n");
}

#[test]
fn template_workflow() {
    let temp = TempDir::new().unwrap();
    write_instance(
        &temp.path().join("api"),
        "name: api\ncomponent: scf\norg: acme\napp: shop\ninputs:\n  src: ./code\n",
    );
    write_instance(
        &temp.path().join("web"),
        "name: web\ncomponent: website\norg: acme\napp: shop\n",
    );

    let mut env = MemoryEnvironment::new();
    let orgs = StaticOrgResolver::none();
    let overrides = Overrides {
        stage: Some("prod".into()),
        ..Default::default()
    };
    let mut loader = InstanceLoader::new(temp.path(), &mut env, &orgs).with_overrides(overrides);

    let template = load_template(temp.path(), &mut loader).unwrap().unwrap();

    assert_eq!(template.len(), 2);
    assert_eq!(template.org.as_deref(), Some("acme"));
    assert_eq!(template.stage.as_deref(), Some("prod"));
    assert_eq!(
        template.instances["api"].inputs.as_ref().unwrap().src,
        Some(SourceSpec::Path(temp.path().join("api").join("code")))
    );
}

#[test]
fn unresolved_org_is_missing_field() {
    let temp = TempDir::new().unwrap();
    write_instance(temp.path(), "name: api\ncomponent: scf\n");

    let mut env = MemoryEnvironment::new();
    let orgs = StaticOrgResolver::none();
    let mut loader = InstanceLoader::new(temp.path(), &mut env, &orgs);

    match loader.load(temp.path()).unwrap_err() {
        SlsError::MissingField { field } => assert_eq!(field, "org"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn credential_store_and_env_sync_compose() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".env"), "TENCENT_APP_ID=old\nOTHER=1\n").unwrap();

    let mut env = MemoryEnvironment::new().with_var("TENCENT_APP_ID", "abc");
    let store = CredentialStore::new(temp.path().to_path_buf());
    let values: BTreeMap<String, String> = store.resolve_variables(&env, None).unwrap();
    EnvFileSync::in_dir(temp.path()).sync(&mut env, &values).unwrap();

    let content = fs::read_to_string(temp.path().join(".env")).unwrap();
    assert_eq!(content, "OTHER=1\nTENCENT_APP_ID=abc\n");

    let credentials = store.resolve(&env, None).unwrap();
    assert_eq!(credentials.get("tencent", "AppId"), Some("abc"));
}
