//! Network resources: VPC, subnets, security groups

use crate::synth::{props, Resource, Value};

/// Isolated network for the compute stack
#[derive(Debug, Clone)]
pub struct Vpc {
    pub cidr_block: String,
}

impl Default for Vpc {
    fn default() -> Self {
        Self {
            cidr_block: "10.0.0.0/16".to_string(),
        }
    }
}

impl Vpc {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::EC2::VPC")
            .with("CidrBlock", self.cidr_block.as_str())
            .with("EnableDnsSupport", true)
            .with("EnableDnsHostnames", true)
    }
}

/// Whether a subnet routes to the internet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubnetKind {
    Public,
    Private,
}

/// One subnet within an availability zone
#[derive(Debug, Clone)]
pub struct Subnet {
    pub vpc: Value,
    pub kind: SubnetKind,
    /// Zero-based AZ index within the region
    pub az_index: u32,
    pub cidr_block: String,
}

impl Subnet {
    /// Derive the subnet for an AZ index; public subnets take the low /24s
    pub fn for_az(vpc: Value, kind: SubnetKind, az_index: u32, max_azs: u32) -> Self {
        let offset = match kind {
            SubnetKind::Public => az_index,
            SubnetKind::Private => max_azs + az_index,
        };
        Self {
            vpc,
            kind,
            az_index,
            cidr_block: format!("10.0.{offset}.0/24"),
        }
    }

    pub fn render(&self, region: &str) -> Resource {
        let az = format!("{}{}", region, (b'a' + self.az_index as u8) as char);
        Resource::new("AWS::EC2::Subnet")
            .with("VpcId", self.vpc.clone())
            .with("AvailabilityZone", az)
            .with("CidrBlock", self.cidr_block.as_str())
            .with(
                "MapPublicIpOnLaunch",
                matches!(self.kind, SubnetKind::Public),
            )
    }
}

/// Security group; egress stays closed unless allowed
#[derive(Debug, Clone)]
pub struct SecurityGroup {
    pub description: String,
    pub vpc: Value,
    pub allow_all_outbound: bool,
}

impl SecurityGroup {
    pub fn render(&self) -> Resource {
        let mut resource = Resource::new("AWS::EC2::SecurityGroup")
            .with("GroupDescription", self.description.as_str())
            .with("VpcId", self.vpc.clone());
        if self.allow_all_outbound {
            resource = resource.with(
                "SecurityGroupEgress",
                Value::list([props([
                    ("CidrIp", Value::string("0.0.0.0/0")),
                    ("IpProtocol", Value::string("-1")),
                ])]),
            );
        } else {
            // Placeholder rule that permits nothing, matching the provider's
            // way of disabling the implicit allow-all egress
            resource = resource.with(
                "SecurityGroupEgress",
                Value::list([props([
                    ("CidrIp", Value::string("255.255.255.255/32")),
                    ("IpProtocol", Value::string("icmp")),
                    ("FromPort", Value::from(252i64)),
                    ("ToPort", Value::from(86i64)),
                    (
                        "Description",
                        Value::string("Disallow all traffic"),
                    ),
                ])]),
            );
        }
        resource
    }
}

/// Standalone ingress rule between two security groups
#[derive(Debug, Clone)]
pub struct SecurityGroupIngress {
    pub group: Value,
    pub source_group: Value,
    pub port: u16,
    pub description: String,
}

impl SecurityGroupIngress {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::EC2::SecurityGroupIngress")
            .with("GroupId", self.group.clone())
            .with("SourceSecurityGroupId", self.source_group.clone())
            .with("IpProtocol", "tcp")
            .with("FromPort", self.port)
            .with("ToPort", self.port)
            .with("Description", self.description.as_str())
    }
}
