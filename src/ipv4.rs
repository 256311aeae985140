use lazy_static::lazy_static;
use regex::Captures;
use regex::Regex;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::FormatError;

pub const MAX_PREFIX: u8 = 32;

/// Subnet mask with the top `prefix` bits set.
///
/// Prefix lengths above 32 saturate to the all-ones mask.
pub fn subnet_mask(prefix: u8) -> u32 {
    match prefix {
        0 => 0,
        p if p >= MAX_PREFIX => u32::MAX,
        p => u32::MAX << (MAX_PREFIX - p),
    }
}

/// An IPv4 network in `A.B.C.D/P` form.
///
/// The address is kept exactly as written: `10.0.0.5/24` is a valid value
/// whose network address is `10.0.0.5`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Ipv4Cidr {
    net: u32,
    prefix: u8,
}

impl Ipv4Cidr {
    pub fn new(net: u32, prefix: u8) -> Result<Self, FormatError> {
        if prefix > MAX_PREFIX {
            return Err(FormatError::Prefix {
                input: format!("{}/{}", Ipv4Addr::from(net), prefix),
                prefix: prefix.to_string(),
            });
        }
        Ok(Ipv4Cidr { net, prefix })
    }

    /// Caller guarantees `prefix <= 32`.
    pub(crate) fn from_parts(net: u32, prefix: u8) -> Self {
        debug_assert!(prefix <= MAX_PREFIX);
        Ipv4Cidr { net, prefix }
    }

    pub fn network(&self) -> u32 {
        self.net
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix
    }

    pub fn mask(&self) -> u32 {
        subnet_mask(self.prefix)
    }

    pub fn broadcast(&self) -> u32 {
        self.net | !self.mask()
    }

    pub fn first_ip(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.net)
    }

    pub fn last_ip(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.broadcast())
    }

    /// Inclusive numeric range `(network, broadcast)`.
    pub fn to_range(&self) -> (u32, u32) {
        (self.net, self.broadcast())
    }

    pub fn contains_ip(&self, ip: &Ipv4Addr) -> bool {
        let (from, to) = self.to_range();
        let ip = u32::from(*ip);
        from <= ip && ip <= to
    }

    pub fn contains_cidr(&self, cidr: &Ipv4Cidr) -> bool {
        let (from, to) = self.to_range();
        let (f, t) = cidr.to_range();
        from <= f && t <= to
    }
}

impl FromStr for Ipv4Cidr {
    type Err = FormatError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref RE: Regex = Regex::new(
                r"^([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})/([0-9]{1,2})$"
            )
            .expect("CIDR pattern is valid");
        }
        fn field<'t>(ind: usize, v: &Captures<'t>) -> &'t str {
            v.get(ind).map_or("", |m| m.as_str())
        }

        let v = RE
            .captures(s)
            .ok_or_else(|| FormatError::Shape(s.to_owned()))?;

        let mut net = 0u32;
        for ind in 1..=4 {
            let octet = field(ind, &v);
            let value = octet
                .parse::<u8>()
                .map_err(|_| FormatError::Octet {
                    input: s.to_owned(),
                    octet: octet.to_owned(),
                })?;
            net = (net << 8) | u32::from(value);
        }

        let prefix = field(5, &v);
        match prefix.parse::<u8>() {
            Ok(p) if p <= MAX_PREFIX => Ok(Ipv4Cidr { net, prefix: p }),
            _ => Err(FormatError::Prefix {
                input: s.to_owned(),
                prefix: prefix.to_owned(),
            }),
        }
    }
}

impl Display for Ipv4Cidr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.first_ip(), self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn new_keeps_literal_address() {
        let host = Ipv4Cidr::new(0xC0A8_0A05, 24).unwrap();
        assert_eq!("192.168.10.5/24", host.to_string());
        assert_eq!((0xC0A8_0A05, 0xC0A8_0AFF), host.to_range());

        let everything = Ipv4Cidr::new(0x0102_0304, 0).unwrap();
        assert_eq!(u32::MAX, everything.broadcast());
        assert_eq!(Ipv4Addr::new(255, 255, 255, 255), everything.last_ip());

        match Ipv4Cidr::new(0x0A00_0000, 33) {
            Err(FormatError::Prefix { input, prefix }) => {
                assert_eq!("10.0.0.0/33", input);
                assert_eq!("33", prefix);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn masks() {
        assert_eq!(0, subnet_mask(0));
        assert_eq!(0x8000_0000, subnet_mask(1));
        assert_eq!(0xFFFF_FF00, subnet_mask(24));
        assert_eq!(u32::MAX, subnet_mask(32));
    }

    #[test]
    fn parse_ok() {
        let cidr = Ipv4Cidr::from_str("213.199.180.192/27").unwrap();
        assert_eq!(0xD5C7_B4C0, cidr.network());
        assert_eq!(27, cidr.prefix_len());
        assert_eq!(Ipv4Addr::new(213, 199, 180, 223), cidr.last_ip());

        let any = Ipv4Cidr::from_str("0.0.0.0/0").unwrap();
        assert_eq!((0, u32::MAX), any.to_range());
    }

    #[test]
    fn host_bits_are_kept() {
        let cidr = Ipv4Cidr::from_str("10.0.0.5/24").unwrap();
        assert_eq!("10.0.0.5/24", cidr.to_string());
        assert_eq!(Ipv4Addr::new(10, 0, 0, 255), cidr.last_ip());
    }

    #[test]
    fn leading_zeros_are_decimal() {
        let cidr = Ipv4Cidr::from_str("010.001.0.0/16").unwrap();
        assert_eq!("10.1.0.0/16", cidr.to_string());
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            Err(FormatError::Prefix {
                input: "10.0.0.0/33".to_owned(),
                prefix: "33".to_owned()
            }),
            Ipv4Cidr::from_str("10.0.0.0/33")
        );
        assert_eq!(
            Err(FormatError::Octet {
                input: "10.0.0.256/24".to_owned(),
                octet: "256".to_owned()
            }),
            Ipv4Cidr::from_str("10.0.0.256/24")
        );
        for bad in &[
            "",
            "10.0.0.0",
            "10.0.0.0/",
            "10.0.0.0/8/8",
            "10.0.0/8",
            "10.0.0.0.0/8",
            "a.b.c.d/8",
            "10.0.0.0/x",
            " 10.0.0.0/8",
            "10.0.0.0/8 ",
            "10.0.0.1000/8",
            "10.0.0.0/100",
            "-1.0.0.0/8",
        ] {
            assert_eq!(
                Err(FormatError::Shape(bad.to_string())),
                Ipv4Cidr::from_str(bad),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn containment() {
        let net = Ipv4Cidr::from_str("192.168.0.0/16").unwrap();
        let sub = Ipv4Cidr::from_str("192.168.10.0/24").unwrap();
        assert!(net.contains_cidr(&sub));
        assert!(!sub.contains_cidr(&net));
        assert!(net.contains_ip(&Ipv4Addr::new(192, 168, 255, 255)));
        assert!(!net.contains_ip(&Ipv4Addr::new(192, 169, 0, 0)));
    }

    #[quickcheck]
    fn display_parses_back(ip: u32, p: u8) -> bool {
        let cidr = Ipv4Cidr::new(ip, p % 33).unwrap();
        let text = cidr.to_string();
        let parsed = Ipv4Cidr::from_str(&text);
        parsed == Ok(cidr) && parsed.map(|c| c.network()) == Ok(ip)
    }

    #[quickcheck]
    fn block_holds_its_own_ends(ip: u32, p: u8) -> bool {
        let cidr = Ipv4Cidr::new(ip, p % 33).unwrap();
        cidr.contains_ip(&cidr.first_ip())
            && cidr.contains_ip(&cidr.last_ip())
            && cidr.contains_cidr(&cidr)
    }

    #[quickcheck]
    fn check_mask_broadcast(ip: u32, i: u8) -> bool {
        let cidr = Ipv4Cidr::new(ip, i % 33).unwrap();
        let (from, to) = cidr.to_range();
        let host_bits = 32 - u32::from(cidr.prefix_len());
        cidr.mask().count_ones() == u32::from(cidr.prefix_len())
            && from <= to
            && to & cidr.mask() == from & cidr.mask()
            && (!cidr.mask()).count_ones() == host_bits
            && to | cidr.mask() == u32::MAX
    }

    #[quickcheck]
    fn check_contains_cidr(ip: u32, i: u8) -> bool {
        let i = i % 32;
        let ip = ip & subnet_mask(i + 1);
        let a0 = Ipv4Cidr::new(ip & subnet_mask(i), i).unwrap();
        let a1 = Ipv4Cidr::new(ip, i + 1).unwrap();
        a0.contains_cidr(&a1) && !a1.contains_cidr(&a0)
    }
}
