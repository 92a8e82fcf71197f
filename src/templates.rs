use minijinja::{path_loader, Environment};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

pub const INDEX: &str = "index.html";
pub const PXE_CLOUD_CONFIG: &str = "pxe-cloud-config.yml";

/// Named templates, looked up lazily so edits on disk are picked up on first use.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn from_dir(dir: PathBuf) -> Self {
        debug!("Loading templates from: {}", dir.to_string_lossy());

        let mut env = Environment::new();
        env.set_loader(path_loader(dir));

        Self { env }
    }

    pub fn render<C: Serialize>(&self, name: &str, context: C) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(context)
    }
}

impl From<Environment<'static>> for Templates {
    fn from(env: Environment<'static>) -> Self {
        Self { env }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn html_is_escaped_and_yaml_is_not() {
        let mut env = Environment::new();
        env.add_template(INDEX, "{{ version }}").unwrap();
        env.add_template(PXE_CLOUD_CONFIG, "{{ version }}").unwrap();
        let templates = Templates::from(env);

        let version = "1.0 <rc&1>";
        assert_eq!(
            templates.render(INDEX, context! { version }).unwrap(),
            "1.0 &lt;rc&amp;1&gt;"
        );
        assert_eq!(
            templates.render(PXE_CLOUD_CONFIG, context! { version }).unwrap(),
            "1.0 <rc&1>"
        );
    }

    #[test]
    fn missing_template_is_an_error() {
        let templates = Templates::from_dir(PathBuf::from("/nonexistent/bootstrapper"));
        assert!(templates.render(INDEX, context! {}).is_err());
    }

    #[test]
    fn shipped_templates_render() {
        let templates =
            Templates::from_dir(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates"));

        let index = templates.render(INDEX, context! { version => "0.3.1" }).unwrap();
        assert!(index.contains("0.3.1"));

        let cloud_config = templates
            .render(
                PXE_CLOUD_CONFIG,
                context! { private_ip => "10.0.0.42", public_ip => "10.0.0.42", node_num => "42" },
            )
            .unwrap();
        assert!(cloud_config.starts_with("#cloud-config"));
        assert!(cloud_config.contains("node-42"));
        serde_yaml::from_str::<serde_yaml::Value>(&cloud_config).unwrap();
    }
}
