//! Registry stack: resolves the app image repository
//!
//! Pure reference - the repository already exists and is owned elsewhere;
//! nothing is created here.

use crate::error::InfraResult;
use crate::resources::RepositoryHandle;
use crate::synth::{Stack, StackEnv, Value};

pub struct RegistryStack {
    pub stack: Stack,
    pub repository: RepositoryHandle,
}

impl RegistryStack {
    pub fn new(name: &str, env: &StackEnv, repository_name: &str) -> InfraResult<Self> {
        let mut stack = Stack::new(name, env);

        let repository = RepositoryHandle {
            repository_name: repository_name.to_string(),
            account: env.account.clone(),
            region: env.region.clone(),
        };
        stack.add_output(
            "RepositoryUri",
            Value::string(repository.image_uri()),
            "Image reference the compute stack deploys",
        )?;

        Ok(Self { stack, repository })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> StackEnv {
        StackEnv {
            account: "692859939927".to_string(),
            region: "ap-southeast-2".to_string(),
        }
    }

    #[test]
    fn creates_nothing() {
        let registry = RegistryStack::new("PinglnRepo", &env(), "pingln-web").unwrap();
        assert_eq!(registry.stack.resource_count(), 0);
        assert!(registry.repository.image_uri().contains("pingln-web"));
    }
}
