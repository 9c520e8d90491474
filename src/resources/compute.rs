//! Container compute resources: cluster, task definition, service,
//! load balancer, autoscaling

use std::collections::BTreeMap;

use crate::synth::{props, Resource, Value};

/// Container cluster bound to a VPC
#[derive(Debug, Clone)]
pub struct Cluster;

impl Cluster {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::ECS::Cluster")
    }
}

/// Log group the container streams to
#[derive(Debug, Clone)]
pub struct LogGroup {
    pub retention_days: u32,
}

impl LogGroup {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::Logs::LogGroup").with("RetentionInDays", self.retention_days)
    }
}

/// One container within a task definition
///
/// Plain environment entries and secret references are kept apart by
/// construction; credential material can only enter through `secrets`.
#[derive(Debug, Clone)]
pub struct ContainerDefinition {
    pub name: String,
    pub image: String,
    pub container_port: u16,
    pub environment: BTreeMap<String, Value>,
    pub secrets: BTreeMap<String, Value>,
    pub log_group: Value,
    pub log_stream_prefix: String,
}

impl ContainerDefinition {
    fn to_value(&self) -> Value {
        let environment = Value::list(self.environment.iter().map(|(name, value)| {
            props([
                ("Name", Value::string(name)),
                ("Value", value.clone()),
            ])
        }));
        let secrets = Value::list(self.secrets.iter().map(|(name, value_from)| {
            props([
                ("Name", Value::string(name)),
                ("ValueFrom", value_from.clone()),
            ])
        }));

        props([
            ("Name", Value::string(&self.name)),
            ("Image", Value::string(&self.image)),
            ("Essential", Value::Bool(true)),
            (
                "PortMappings",
                Value::list([props([(
                    "ContainerPort",
                    Value::from(self.container_port),
                )])]),
            ),
            ("Environment", environment),
            ("Secrets", secrets),
            (
                "LogConfiguration",
                props([
                    ("LogDriver", Value::string("awslogs")),
                    (
                        "Options",
                        props([
                            ("awslogs-group", self.log_group.clone()),
                            (
                                "awslogs-stream-prefix",
                                Value::string(&self.log_stream_prefix),
                            ),
                        ]),
                    ),
                ]),
            ),
        ])
    }
}

/// Fargate task definition
#[derive(Debug, Clone)]
pub struct TaskDefinition {
    pub cpu: u32,
    pub memory_mib: u32,
    pub task_role: Value,
    pub execution_role: Value,
    pub container: ContainerDefinition,
}

impl TaskDefinition {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::ECS::TaskDefinition")
            .with("RequiresCompatibilities", Value::list([Value::string("FARGATE")]))
            .with("NetworkMode", "awsvpc")
            .with("Cpu", self.cpu.to_string())
            .with("Memory", self.memory_mib.to_string())
            .with("TaskRoleArn", self.task_role.clone())
            .with("ExecutionRoleArn", self.execution_role.clone())
            .with(
                "ContainerDefinitions",
                Value::list([self.container.to_value()]),
            )
    }
}

/// Public application load balancer
#[derive(Debug, Clone)]
pub struct LoadBalancer {
    pub subnets: Vec<Value>,
    pub security_groups: Vec<Value>,
}

impl LoadBalancer {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::ElasticLoadBalancingV2::LoadBalancer")
            .with("Type", "application")
            .with("Scheme", "internet-facing")
            .with("Subnets", Value::List(self.subnets.clone()))
            .with("SecurityGroups", Value::List(self.security_groups.clone()))
    }
}

/// Target group health-checking the service
#[derive(Debug, Clone)]
pub struct TargetGroup {
    pub vpc: Value,
    pub port: u16,
    pub health_check_path: String,
    pub healthy_http_codes: String,
}

impl TargetGroup {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::ElasticLoadBalancingV2::TargetGroup")
            .with("VpcId", self.vpc.clone())
            .with("Port", self.port)
            .with("Protocol", "HTTP")
            .with("TargetType", "ip")
            .with("HealthCheckEnabled", true)
            .with("HealthCheckPath", self.health_check_path.as_str())
            .with(
                "Matcher",
                props([(
                    "HttpCode",
                    Value::string(&self.healthy_http_codes),
                )]),
            )
    }
}

/// Plain-HTTP listener forwarding to a target group
///
/// TLS terminates at the edge distribution, so the balancer listens on 80
/// and never redirects.
#[derive(Debug, Clone)]
pub struct Listener {
    pub load_balancer: Value,
    pub target_group: Value,
}

impl Listener {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::ElasticLoadBalancingV2::Listener")
            .with("LoadBalancerArn", self.load_balancer.clone())
            .with("Port", Value::from(80i64))
            .with("Protocol", "HTTP")
            .with(
                "DefaultActions",
                Value::list([props([
                    ("Type", Value::string("forward")),
                    ("TargetGroupArn", self.target_group.clone()),
                ])]),
            )
    }
}

/// Fargate service behind the load balancer
#[derive(Debug, Clone)]
pub struct FargateService {
    pub cluster: Value,
    pub task_definition: Value,
    pub desired_count: u32,
    pub container_name: String,
    pub container_port: u16,
    pub target_group: Value,
    pub subnets: Vec<Value>,
    pub security_groups: Vec<Value>,
    pub enable_execute_command: bool,
}

impl FargateService {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::ECS::Service")
            .with("Cluster", self.cluster.clone())
            .with("TaskDefinition", self.task_definition.clone())
            .with("DesiredCount", self.desired_count)
            .with("LaunchType", "FARGATE")
            .with("EnableExecuteCommand", self.enable_execute_command)
            .with(
                "LoadBalancers",
                Value::list([props([
                    ("ContainerName", Value::string(&self.container_name)),
                    ("ContainerPort", Value::from(self.container_port)),
                    ("TargetGroupArn", self.target_group.clone()),
                ])]),
            )
            .with(
                "NetworkConfiguration",
                props([(
                    "AwsvpcConfiguration",
                    props([
                        ("Subnets", Value::List(self.subnets.clone())),
                        (
                            "SecurityGroups",
                            Value::List(self.security_groups.clone()),
                        ),
                    ]),
                )]),
            )
    }
}

/// Registers the service's task count with the autoscaler
#[derive(Debug, Clone)]
pub struct ScalableTarget {
    pub cluster: Value,
    pub service_name: Value,
    pub min_capacity: u32,
    pub max_capacity: u32,
}

impl ScalableTarget {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::ApplicationAutoScaling::ScalableTarget")
            .with("ServiceNamespace", "ecs")
            .with("ScalableDimension", "ecs:service:DesiredCount")
            .with(
                "ResourceId",
                Value::concat([
                    Value::string("service/"),
                    self.cluster.clone(),
                    Value::string("/"),
                    self.service_name.clone(),
                ]),
            )
            .with("MinCapacity", self.min_capacity)
            .with("MaxCapacity", self.max_capacity)
    }
}

/// Which utilization metric a scaling policy tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingMetric {
    Cpu,
    Memory,
}

impl ScalingMetric {
    fn predefined_metric(self) -> &'static str {
        match self {
            ScalingMetric::Cpu => "ECSServiceAverageCPUUtilization",
            ScalingMetric::Memory => "ECSServiceAverageMemoryUtilization",
        }
    }
}

/// Target-tracking scaling policy; CPU and memory policies are independent,
/// either trigger fires a scale event
#[derive(Debug, Clone)]
pub struct ScalingPolicy {
    pub scalable_target: Value,
    pub metric: ScalingMetric,
    pub target_percent: u32,
}

impl ScalingPolicy {
    pub fn render(&self) -> Resource {
        let name = match self.metric {
            ScalingMetric::Cpu => "CpuScaling",
            ScalingMetric::Memory => "MemoryScaling",
        };
        Resource::new("AWS::ApplicationAutoScaling::ScalingPolicy")
            .with("PolicyName", name)
            .with("PolicyType", "TargetTrackingScaling")
            .with("ScalingTargetId", self.scalable_target.clone())
            .with(
                "TargetTrackingScalingPolicyConfiguration",
                props([
                    (
                        "PredefinedMetricSpecification",
                        props([(
                            "PredefinedMetricType",
                            Value::string(self.metric.predefined_metric()),
                        )]),
                    ),
                    (
                        "TargetValue",
                        Value::from(i64::from(self.target_percent)),
                    ),
                ]),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::LogicalId;

    fn value(id: &str) -> Value {
        Value::Ref(LogicalId::new(id).unwrap())
    }

    fn container() -> ContainerDefinition {
        let mut environment = BTreeMap::new();
        environment.insert("DB_HOST".to_string(), Value::string("host"));
        let mut secrets = BTreeMap::new();
        secrets.insert("DB_PASSWORD".to_string(), Value::string("arn:ref"));
        ContainerDefinition {
            name: "web".to_string(),
            image: "image:latest".to_string(),
            container_port: 3000,
            environment,
            secrets,
            log_group: value("LogGroup"),
            log_stream_prefix: "web".to_string(),
        }
    }

    #[test]
    fn container_keeps_env_and_secrets_apart() {
        let json = serde_json::to_string(&container().to_value()).unwrap();
        assert!(json.contains("\"Environment\""));
        assert!(json.contains("\"Secrets\""));
        assert!(json.contains("\"ValueFrom\""));
    }

    #[test]
    fn target_group_checks_up_path() {
        let group = TargetGroup {
            vpc: value("Vpc"),
            port: 3000,
            health_check_path: "/up".to_string(),
            healthy_http_codes: "200".to_string(),
        };
        let resource = group.render();
        assert_eq!(
            resource
                .property("HealthCheckPath")
                .and_then(Value::as_str),
            Some("/up")
        );
    }

    #[test]
    fn scaling_policies_track_independent_metrics() {
        let target = value("ScalableTarget");
        let cpu = ScalingPolicy {
            scalable_target: target.clone(),
            metric: ScalingMetric::Cpu,
            target_percent: 70,
        };
        let memory = ScalingPolicy {
            scalable_target: target,
            metric: ScalingMetric::Memory,
            target_percent: 80,
        };
        let cpu_json = serde_json::to_string(&cpu.render()).unwrap();
        let memory_json = serde_json::to_string(&memory.render()).unwrap();
        assert!(cpu_json.contains("ECSServiceAverageCPUUtilization"));
        assert!(cpu_json.contains("\"TargetValue\":70"));
        assert!(memory_json.contains("ECSServiceAverageMemoryUtilization"));
        assert!(memory_json.contains("\"TargetValue\":80"));
    }
}
