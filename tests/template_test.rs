use std::fs;
use std::path::Path;

use inochi::error::Error;
use inochi::generate::{FileGenerator, Notifier, WriteOutcome};
use inochi::renderer::{MiniJinjaRenderer, TemplateRenderer};
use inochi::template::{builtin_template, make_executable, TemplateEngine};
use serde_json::json;
use tempfile::TempDir;

struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _action: &str, _path: &Path) {}
}

fn write_template(dir: &Path, name: &str, source: &str) {
    fs::write(dir.join(format!("{name}.j2")), source).unwrap();
}

#[test]
fn test_minijinja_renderer() {
    let renderer = MiniJinjaRenderer::new();
    let context = json!({"name": "test", "value": 42});

    let result = renderer.render("greeting", "Hello {{ name }}!", &context).unwrap();
    assert_eq!(result, "Hello test!");

    let result = renderer.render("value", "Value: {{ value }}", &context).unwrap();
    assert_eq!(result, "Value: 42");
}

#[test]
fn test_renderer_chomps_one_trailing_newline() {
    let renderer = MiniJinjaRenderer::new();
    let context = json!({"name": "x"});

    assert_eq!(renderer.render("t", "a {{ name }}\n", &context).unwrap(), "a x");
    assert_eq!(renderer.render("t", "a {{ name }}\n\n", &context).unwrap(), "a x\n");
    assert_eq!(renderer.render("t", "a\n  b {{ name }}\nc\n\n", &context).unwrap(), "a\n  b x\nc\n");
}

#[test]
fn test_renderer_rejects_undefined_names() {
    let renderer = MiniJinjaRenderer::new();
    let result = renderer.render("broken", "Hello {{ missing }}!", &json!({"name": "x"}));

    match result {
        Err(Error::TemplateError(message)) => assert!(message.contains("broken")),
        other => panic!("Expected TemplateError, got {other:?}"),
    }
}

#[test]
fn test_renderer_rejects_invalid_syntax() {
    let renderer = MiniJinjaRenderer::new();
    let result = renderer.render("broken", "{% if %}", &json!({}));
    assert!(matches!(result, Err(Error::TemplateError(_))));
}

#[test]
fn test_render_and_write() {
    let templates = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_template(templates.path(), "README", "# {{ project }}\n\n{{ tagline }}\n\n");

    let renderer = MiniJinjaRenderer::new();
    let notifier = SilentNotifier;
    let generator = FileGenerator::new(&notifier, None);
    let engine = TemplateEngine::new(templates.path(), &renderer, &generator);

    let context = json!({"project": "Foo", "tagline": "Does things"});
    let target = output.path().join("README");

    let outcome = engine.render_and_write("README", &context, &target).unwrap();
    assert_eq!(outcome, WriteOutcome::Created);
    assert_eq!(fs::read_to_string(&target).unwrap(), "# Foo\n\nDoes things\n");

    let outcome = engine.render_and_write("README", &context, &target).unwrap();
    assert_eq!(outcome, WriteOutcome::Skipped);
}

#[test]
fn test_create_defaults_to_basename() {
    let templates = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_template(templates.path(), "helper.rb", "require '{{ package }}'\n\n");
    write_template(templates.path(), "library", "module {{ library }}\nend\n\n");

    let renderer = MiniJinjaRenderer::new();
    let notifier = SilentNotifier;
    let generator = FileGenerator::new(&notifier, None);
    let engine = TemplateEngine::new(templates.path(), &renderer, &generator);
    let context = json!({"package": "foo", "library": "Foo"});

    let helper = output.path().join("test/helper.rb");
    engine.create(&helper, None, &context).unwrap();
    assert_eq!(fs::read_to_string(&helper).unwrap(), "require 'foo'\n");

    let library = output.path().join("lib/foo.rb");
    engine.create(&library, Some("library"), &context).unwrap();
    assert_eq!(fs::read_to_string(&library).unwrap(), "module Foo\nend\n");
}

#[test]
fn test_missing_template() {
    let templates = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let renderer = MiniJinjaRenderer::new();
    let notifier = SilentNotifier;
    let generator = FileGenerator::new(&notifier, None);
    let engine = TemplateEngine::new(templates.path(), &renderer, &generator);

    let target = output.path().join("NOPE");
    match engine.create(&target, None, &json!({})) {
        Err(Error::TemplateNotFoundError { template, .. }) => assert_eq!(template, "NOPE"),
        other => panic!("Expected TemplateNotFoundError, got {other:?}"),
    }
    assert!(!target.exists());
}

#[test]
fn test_undefined_binding_writes_nothing() {
    let templates = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_template(templates.path(), "USAGE", "Run {{ program }}\n");

    let renderer = MiniJinjaRenderer::new();
    let notifier = SilentNotifier;
    let generator = FileGenerator::new(&notifier, None);
    let engine = TemplateEngine::new(templates.path(), &renderer, &generator);

    let target = output.path().join("USAGE");
    assert!(matches!(engine.create(&target, None, &json!({})), Err(Error::TemplateError(_))));
    assert!(!target.exists());
}

#[test]
fn test_template_path() {
    let renderer = MiniJinjaRenderer::new();
    let notifier = SilentNotifier;
    let generator = FileGenerator::new(&notifier, None);
    let engine = TemplateEngine::new("/usr/share/inochi", &renderer, &generator);

    assert_eq!(
        engine.template_path("command").as_deref(),
        Some(Path::new("/usr/share/inochi/command.j2"))
    );
    assert_eq!(engine.template_dir(), Some(Path::new("/usr/share/inochi")));
}

#[test]
fn test_builtin_templates() {
    let renderer = MiniJinjaRenderer::new();
    let notifier = SilentNotifier;
    let generator = FileGenerator::new(&notifier, None);
    let engine = TemplateEngine::with_default_templates(&renderer, &generator);

    assert_eq!(engine.template_dir(), None);
    assert_eq!(engine.template_path("LICENSE"), None);
    assert!(builtin_template("command").is_some());
    assert!(builtin_template("nope").is_none());

    let license = engine.render("LICENSE", &json!({"year": "2026"})).unwrap();
    assert!(license.contains("Copyright 2026 Your Name <your@email.com>"));
    assert!(license.ends_with('\n') && !license.ends_with("\n\n"));
}

#[test]
fn test_missing_builtin_template() {
    let renderer = MiniJinjaRenderer::new();
    let notifier = SilentNotifier;
    let generator = FileGenerator::new(&notifier, None);
    let engine = TemplateEngine::with_default_templates(&renderer, &generator);

    match engine.render("NOPE", &json!({})) {
        Err(Error::TemplateNotFoundError { template, template_dir }) => {
            assert_eq!(template, "NOPE");
            assert_eq!(template_dir, "built-in templates");
        }
        other => panic!("Expected TemplateNotFoundError, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn test_make_executable() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("runner");
    fs::write(&path, "#!/bin/sh\n").unwrap();

    make_executable(&path).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o755);
}
