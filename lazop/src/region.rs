use std::fmt;
use std::str::FromStr;

use lazop_core::Error;

/// Region selects the marketplace, and with it the api host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Daraz Sri Lanka
    SriLanka,
    /// Lazada Philippines
    Philippines,
    /// Daraz Bangladesh
    Bangladesh,
    /// Lazada Thailand
    Thailand,
    /// Lazada Vietnam
    Vietnam,
    /// Daraz Pakistan
    Pakistan,
    /// Lazada Singapore
    Singapore,
    /// Daraz Nepal
    Nepal,
    /// Lazada Indonesia
    Indonesia,
    /// Shop.com.mm Myanmar
    Myanmar,
    /// Lazada Malaysia
    Malaysia,
}

impl Region {
    /// All supported regions.
    pub const ALL: [Region; 11] = [
        Region::SriLanka,
        Region::Philippines,
        Region::Bangladesh,
        Region::Thailand,
        Region::Vietnam,
        Region::Pakistan,
        Region::Singapore,
        Region::Nepal,
        Region::Indonesia,
        Region::Myanmar,
        Region::Malaysia,
    ];

    /// Two letter code of the region.
    pub fn code(&self) -> &'static str {
        match self {
            Region::SriLanka => "lk",
            Region::Philippines => "ph",
            Region::Bangladesh => "bd",
            Region::Thailand => "th",
            Region::Vietnam => "vn",
            Region::Pakistan => "pk",
            Region::Singapore => "sg",
            Region::Nepal => "np",
            Region::Indonesia => "id",
            Region::Myanmar => "mm",
            Region::Malaysia => "my",
        }
    }

    /// Base url of the region, always ending with `/`.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Region::SriLanka => "https://api.daraz.lk/",
            Region::Philippines => "https://api.lazada.com.ph/",
            Region::Bangladesh => "https://api.daraz.com.bd/",
            Region::Thailand => "https://api.lazada.co.th/",
            Region::Vietnam => "https://api.lazada.vn/",
            Region::Pakistan => "https://api.daraz.pk/",
            Region::Singapore => "https://api.lazada.sg/",
            Region::Nepal => "https://api.daraz.com.np/",
            Region::Indonesia => "https://api.lazada.co.id/",
            Region::Myanmar => "https://api.shop.com.mm/",
            Region::Malaysia => "https://api.lazada.com.my/",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Region::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or_else(|| Error::config_invalid(format!("unknown region: {s}")))
    }
}
