//! Managed relational database

use crate::resources::handles::SecretHandle;
use crate::synth::{Resource, Value};

/// Minimal managed postgres instance
///
/// Credentials come from a generated secret; the master username/password
/// properties are deploy-time resolutions into it.
#[derive(Debug, Clone)]
pub struct DatabaseInstance {
    pub engine_version: String,
    pub instance_class: String,
    pub allocated_storage_gib: u32,
    pub storage_type: String,
    pub database_name: String,
    pub port: u16,
    pub credentials_secret: Value,
    pub subnet_group: Value,
    pub security_groups: Vec<Value>,
    pub backup_retention_days: u32,
}

impl DatabaseInstance {
    pub fn postgres(
        database_name: impl Into<String>,
        credentials_secret: Value,
        subnet_group: Value,
        security_groups: Vec<Value>,
    ) -> Self {
        Self {
            engine_version: "17.5".to_string(),
            instance_class: "db.t3.micro".to_string(),
            allocated_storage_gib: 20,
            storage_type: "gp2".to_string(),
            database_name: database_name.into(),
            port: 5432,
            credentials_secret,
            subnet_group,
            security_groups,
            backup_retention_days: 1,
        }
    }

    fn resolve_credential(&self, key: &str) -> Value {
        SecretHandle {
            arn: self.credentials_secret.clone(),
        }
        .resolve(key)
    }

    pub fn render(&self) -> Resource {
        Resource::new("AWS::RDS::DBInstance")
            .with("Engine", "postgres")
            .with("EngineVersion", self.engine_version.as_str())
            .with("DBInstanceClass", self.instance_class.as_str())
            .with(
                "AllocatedStorage",
                self.allocated_storage_gib.to_string(),
            )
            .with("StorageType", self.storage_type.as_str())
            .with("DBName", self.database_name.as_str())
            .with("Port", self.port.to_string())
            .with("MasterUsername", self.resolve_credential("username"))
            .with("MasterUserPassword", self.resolve_credential("password"))
            .with("DBSubnetGroupName", self.subnet_group.clone())
            .with(
                "VPCSecurityGroups",
                Value::List(self.security_groups.clone()),
            )
            .with("BackupRetentionPeriod", self.backup_retention_days)
            .with("DeleteAutomatedBackups", true)
            .with("DeletionProtection", false)
            .with("StorageEncrypted", true)
            .with("MonitoringInterval", Value::from(0i64))
            .with("EnablePerformanceInsights", false)
            .with("AutoMinorVersionUpgrade", true)
            .with("AllowMajorVersionUpgrade", false)
    }
}

/// Subnet group placing the database in private subnets only
#[derive(Debug, Clone)]
pub struct SubnetGroup {
    pub description: String,
    pub subnet_ids: Vec<Value>,
}

impl SubnetGroup {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::RDS::DBSubnetGroup")
            .with("DBSubnetGroupDescription", self.description.as_str())
            .with("SubnetIds", Value::List(self.subnet_ids.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::LogicalId;

    fn database() -> DatabaseInstance {
        let secret = Value::Ref(LogicalId::new("DatabaseCredentials").unwrap());
        let subnets = Value::Ref(LogicalId::new("DatabaseSubnetGroup").unwrap());
        DatabaseInstance::postgres("pingln_production", secret, subnets, vec![])
    }

    #[test]
    fn credentials_resolve_through_secret() {
        let json = serde_json::to_string(&database().render()).unwrap();
        assert!(json.contains("{{resolve:secretsmanager:"));
        assert!(json.contains(":SecretString:password}}"));
        // no literal credential anywhere
        assert!(!json.contains("MasterUserPassword\":\""));
    }

    #[test]
    fn sizing_is_minimal() {
        let resource = database().render();
        assert_eq!(
            resource.property("DBInstanceClass").and_then(Value::as_str),
            Some("db.t3.micro")
        );
        assert_eq!(
            resource.property("AllocatedStorage").and_then(Value::as_str),
            Some("20")
        );
        assert_eq!(
            resource.property("Port").and_then(Value::as_str),
            Some("5432")
        );
    }
}
