//! Compute stack: network, database, container service, load balancer,
//! autoscaling
//!
//! Database credentials are generated provider-side and injected into the
//! container as secret references; only host/port/name travel as plain
//! environment values.

use std::collections::BTreeMap;

use crate::config::{DeployConfig, ServiceConfig};
use crate::env::{self, EnvVars};
use crate::error::InfraResult;
use crate::resources::compute::{
    Cluster, ContainerDefinition, FargateService, Listener, LoadBalancer, LogGroup,
    ScalableTarget, ScalingMetric, ScalingPolicy, TargetGroup, TaskDefinition,
};
use crate::resources::database::{DatabaseInstance, SubnetGroup};
use crate::resources::iam::{PolicyStatement, Role};
use crate::resources::network::{SecurityGroup, SecurityGroupIngress, Subnet, SubnetKind, Vpc};
use crate::resources::secrets::GeneratedSecret;
use crate::resources::{
    LoadBalancerHandle, ManagedPolicyHandle, RepositoryHandle, SecretHandle,
};
use crate::synth::{LogicalId, Stack, StackEnv, Value};

const MAX_AZS: u32 = 2;
const TASK_CPU: u32 = 256;
const TASK_MEMORY_MIB: u32 = 512;
const HEALTH_CHECK_PATH: &str = "/up";
const HEALTHY_HTTP_CODES: &str = "200";
const LOG_RETENTION_DAYS: u32 = 30;
const DATABASE_PORT: u16 = 5432;
const CONTAINER_NAME: &str = "web";

/// Cross-stack inputs of the compute stack
pub struct ComputeStackProps<'a> {
    pub repository: &'a RepositoryHandle,
    /// Externally supplied messaging policy, attached to the task role
    pub messaging_policy: Option<&'a ManagedPolicyHandle>,
    /// SMTP credential secret from the notification stack; when absent the
    /// credentials fall back to plain process-env values
    pub smtp_secret: Option<&'a SecretHandle>,
}

#[derive(Debug)]
pub struct ComputeStack {
    pub stack: Stack,
    pub load_balancer: LoadBalancerHandle,
}

impl ComputeStack {
    pub fn new(
        name: &str,
        stack_env: &StackEnv,
        config: &DeployConfig,
        env_vars: &EnvVars,
        props: ComputeStackProps<'_>,
    ) -> InfraResult<Self> {
        let mut stack = Stack::new(name, stack_env);
        let service = &config.service;

        let vpc_id = stack.add("Vpc", Vpc::default().render())?;
        let vpc = Value::Ref(vpc_id);

        let (public_subnets, private_subnets) =
            add_subnets(&mut stack, &vpc, &stack_env.region)?;

        let db_sg_id = stack.add(
            "DatabaseSecurityGroup",
            SecurityGroup {
                description: "Security group for the postgres instance".to_string(),
                vpc: vpc.clone(),
                allow_all_outbound: false,
            }
            .render(),
        )?;

        let service_sg_id = stack.add(
            "ServiceSecurityGroup",
            SecurityGroup {
                description: "Security group for the web service".to_string(),
                vpc: vpc.clone(),
                allow_all_outbound: true,
            }
            .render(),
        )?;

        // Only the service may reach postgres
        stack.add(
            "DatabaseIngress",
            SecurityGroupIngress {
                group: Value::Ref(db_sg_id.clone()),
                source_group: Value::Ref(service_sg_id.clone()),
                port: DATABASE_PORT,
                description: "Allow the web service to connect to postgres".to_string(),
            }
            .render(),
        )?;

        let db_secret_id = stack.add(
            "DatabaseCredentials",
            GeneratedSecret::database_credentials("Postgres database credentials").render(),
        )?;
        let db_secret = SecretHandle {
            arn: Value::Ref(db_secret_id.clone()),
        };

        let subnet_group_id = stack.add(
            "DatabaseSubnetGroup",
            SubnetGroup {
                description: "Subnet group for the postgres instance".to_string(),
                subnet_ids: private_subnets.clone(),
            }
            .render(),
        )?;

        let database_id = stack.add(
            "Database",
            DatabaseInstance::postgres(
                service.database_name.clone(),
                Value::Ref(db_secret_id.clone()),
                Value::Ref(subnet_group_id),
                vec![Value::Ref(db_sg_id.clone())],
            )
            .render(),
        )?;

        let cluster_id = stack.add("Cluster", Cluster.render())?;
        let log_group_id = stack.add(
            "LogGroup",
            LogGroup {
                retention_days: LOG_RETENTION_DAYS,
            }
            .render(),
        )?;

        let (task_role_id, execution_role_id) =
            add_roles(&mut stack, &db_secret, props.messaging_policy, props.smtp_secret)?;

        let container = build_container(
            service,
            props.repository,
            &database_id,
            &db_secret,
            props.smtp_secret,
            env_vars,
            Value::Ref(log_group_id),
        )?;

        let task_def_id = stack.add(
            "TaskDefinition",
            TaskDefinition {
                cpu: TASK_CPU,
                memory_mib: TASK_MEMORY_MIB,
                task_role: Value::get_att(&task_role_id, "Arn"),
                execution_role: Value::get_att(&execution_role_id, "Arn"),
                container,
            }
            .render(),
        )?;

        let alb_id = stack.add(
            "LoadBalancer",
            LoadBalancer {
                subnets: public_subnets,
                security_groups: vec![Value::Ref(service_sg_id.clone())],
            }
            .render(),
        )?;

        let target_group_id = stack.add(
            "TargetGroup",
            TargetGroup {
                vpc,
                port: service.container_port,
                health_check_path: HEALTH_CHECK_PATH.to_string(),
                healthy_http_codes: HEALTHY_HTTP_CODES.to_string(),
            }
            .render(),
        )?;

        stack.add(
            "Listener",
            Listener {
                load_balancer: Value::Ref(alb_id.clone()),
                target_group: Value::Ref(target_group_id.clone()),
            }
            .render(),
        )?;

        let service_id = stack.add(
            "Service",
            FargateService {
                cluster: Value::Ref(cluster_id.clone()),
                task_definition: Value::Ref(task_def_id),
                desired_count: service.desired_count,
                container_name: CONTAINER_NAME.to_string(),
                container_port: service.container_port,
                target_group: Value::Ref(target_group_id),
                subnets: private_subnets,
                security_groups: vec![Value::Ref(service_sg_id.clone())],
                enable_execute_command: true,
            }
            .render(),
        )?;

        let scalable_target_id = stack.add(
            "ScalableTarget",
            ScalableTarget {
                cluster: Value::Ref(cluster_id),
                service_name: Value::get_att(&service_id, "Name"),
                min_capacity: service.min_count,
                max_capacity: service.max_count,
            }
            .render(),
        )?;

        for (id, metric, target) in [
            ("CpuScaling", ScalingMetric::Cpu, service.cpu_target_percent),
            (
                "MemoryScaling",
                ScalingMetric::Memory,
                service.memory_target_percent,
            ),
        ] {
            stack.add(
                id,
                ScalingPolicy {
                    scalable_target: Value::Ref(scalable_target_id.clone()),
                    metric,
                    target_percent: target,
                }
                .render(),
            )?;
        }

        stack.add_output(
            "DatabaseEndpoint",
            Value::get_att(&database_id, "Endpoint.Address"),
            "Postgres database endpoint",
        )?;
        stack.add_output(
            "DatabasePort",
            Value::get_att(&database_id, "Endpoint.Port"),
            "Postgres database port",
        )?;
        stack.add_output(
            "DatabaseSecretArn",
            Value::Ref(db_secret_id),
            "ARN of the database credentials secret",
        )?;
        stack.add_output(
            "DatabaseSecurityGroupId",
            Value::Ref(db_sg_id),
            "Security group id for the database",
        )?;
        let dns_name = stack.export("LoadBalancerDns", Value::get_att(&alb_id, "DNSName"))?;

        Ok(Self {
            stack,
            load_balancer: LoadBalancerHandle { dns_name },
        })
    }
}

/// Public and private subnets across the availability zones
fn add_subnets(
    stack: &mut Stack,
    vpc: &Value,
    region: &str,
) -> InfraResult<(Vec<Value>, Vec<Value>)> {
    let mut public = Vec::new();
    let mut private = Vec::new();
    for az in 0..MAX_AZS {
        for (kind, bucket) in [
            (SubnetKind::Public, &mut public),
            (SubnetKind::Private, &mut private),
        ] {
            let label = match kind {
                SubnetKind::Public => "Public",
                SubnetKind::Private => "Private",
            };
            let id = stack.add(
                &format!("{label}Subnet{}", az + 1),
                Subnet::for_az(vpc.clone(), kind, az, MAX_AZS).render(region),
            )?;
            bucket.push(Value::Ref(id));
        }
    }
    Ok((public, private))
}

/// Task role (least-privilege app permissions) and execution role
/// (image pull, log delivery, secret retrieval)
fn add_roles(
    stack: &mut Stack,
    db_secret: &SecretHandle,
    messaging_policy: Option<&ManagedPolicyHandle>,
    smtp_secret: Option<&SecretHandle>,
) -> InfraResult<(LogicalId, LogicalId)> {
    let mut task_role = Role::for_service("ecs-tasks.amazonaws.com");
    // Interactive session channels for operator debugging
    task_role.statements.push(PolicyStatement::allow(
        &[
            "ssmmessages:CreateControlChannel",
            "ssmmessages:CreateDataChannel",
            "ssmmessages:OpenControlChannel",
            "ssmmessages:OpenDataChannel",
        ],
        vec![Value::string("*")],
    ));
    if let Some(policy) = messaging_policy {
        task_role.managed_policy_arns.push(policy.arn.clone());
    }
    let task_role_id = stack.add("TaskRole", task_role.render())?;

    let mut execution_role = Role::for_service("ecs-tasks.amazonaws.com");
    execution_role.statements.push(PolicyStatement::allow(
        &[
            "ecr:GetAuthorizationToken",
            "ecr:BatchCheckLayerAvailability",
            "ecr:GetDownloadUrlForLayer",
            "ecr:BatchGetImage",
        ],
        vec![Value::string("*")],
    ));
    execution_role.statements.push(PolicyStatement::allow(
        &["logs:CreateLogStream", "logs:PutLogEvents"],
        vec![Value::string("*")],
    ));
    let mut secret_arns = vec![db_secret.arn.clone()];
    if let Some(secret) = smtp_secret {
        secret_arns.push(secret.arn.clone());
    }
    execution_role.statements.push(PolicyStatement::allow(
        &["secretsmanager:GetSecretValue"],
        secret_arns,
    ));
    let execution_role_id = stack.add("ExecutionRole", execution_role.render())?;

    Ok((task_role_id, execution_role_id))
}

fn build_container(
    service: &ServiceConfig,
    repository: &RepositoryHandle,
    database_id: &LogicalId,
    db_secret: &SecretHandle,
    smtp_secret: Option<&SecretHandle>,
    env_vars: &EnvVars,
    log_group: Value,
) -> InfraResult<ContainerDefinition> {
    let mut environment = BTreeMap::new();
    environment.insert("APP_ENV".to_string(), Value::string("production"));
    environment.insert("LOG_TO_STDOUT".to_string(), Value::string("1"));
    environment.insert(
        "DB_HOST".to_string(),
        Value::get_att(database_id, "Endpoint.Address"),
    );
    environment.insert(
        "DB_PORT".to_string(),
        Value::get_att(database_id, "Endpoint.Port"),
    );
    environment.insert(
        "DB_NAME".to_string(),
        Value::string(&service.database_name),
    );

    let consumer = "compute stack container definition";
    for key in [
        env::SECRET_KEY_BASE,
        env::SLACK_CLIENT_ID,
        env::SLACK_CLIENT_SECRET,
        env::DISCORD_PUBLIC_KEY,
    ] {
        environment.insert(key.to_string(), Value::string(env_vars.require(key, consumer)?));
    }

    // Credentials route through secret references only
    let mut secrets = BTreeMap::new();
    secrets.insert(
        "DB_USERNAME".to_string(),
        db_secret.value_from("username"),
    );
    secrets.insert(
        "DB_PASSWORD".to_string(),
        db_secret.value_from("password"),
    );

    match smtp_secret {
        Some(secret) => {
            secrets.insert(
                env::SMTP_USERNAME.to_string(),
                secret.value_from("username"),
            );
            secrets.insert(
                env::SMTP_PASSWORD.to_string(),
                secret.value_from("password"),
            );
        }
        None => {
            for key in [env::SMTP_USERNAME, env::SMTP_PASSWORD] {
                environment
                    .insert(key.to_string(), Value::string(env_vars.require(key, consumer)?));
            }
        }
    }

    Ok(ContainerDefinition {
        name: CONTAINER_NAME.to_string(),
        image: repository.image_uri(),
        container_port: service.container_port,
        environment,
        secrets,
        log_group,
        log_stream_prefix: CONTAINER_NAME.to_string(),
    })
}
