//! GraphQL documents of the northbound interface.
//!
//! Variable names follow the server schema: sites are addressed by `$sitePath`, devices by
//! `$ipAddress`.

/// Looks up one site by its location path.
pub const SITE_BY_LOCATION: &str = r#"
query Site($sitePath: String!) {
  network {
    siteByLocation(location: $sitePath) {
      location
      siteId
      siteName
    }
  }
}
"#;

/// Creates a site at a location path.
pub const CREATE_SITE: &str = r#"
mutation Site($sitePath: String!) {
  network {
    createSite(input: { siteLocation: $sitePath }) {
      errorCode
      siteId
      siteLocation
      status
    }
  }
}
"#;

/// Deletes the site at a location path.
pub const DELETE_SITE: &str = r#"
mutation Site($sitePath: String!) {
  network {
    deleteSite(input: { siteLocation: $sitePath }) {
      errorCode
      siteId
      siteLocation
      status
    }
  }
}
"#;

/// Lists every site.
pub const SITES: &str = r#"
query {
  network {
    sites {
      location
      siteName
    }
  }
}
"#;

/// Lists every managed device.
pub const DEVICES: &str = r#"
query {
  network {
    devices {
      ip
      sysName
      sitePath
    }
  }
}
"#;

/// Looks up one device by IP address.
pub const DEVICE_BY_IP: &str = r#"
query Device($ipAddress: String!) {
  network {
    device(ip: $ipAddress) {
      firmware
      ip
      sysName
      sitePath
    }
  }
}
"#;

/// Reads the firmware version of one device.
pub const DEVICE_FIRMWARE: &str = r#"
query Device($ipAddress: String!) {
  network {
    device(ip: $ipAddress) {
      firmware
    }
  }
}
"#;

/// Reads server uptime and version.
pub const SERVER_INFO: &str = r#"
query {
  administration {
    serverInfo {
      uptime
      version
    }
  }
}
"#;

/// Reads the server version only.
pub const SERVER_VERSION: &str = r#"
query {
  administration {
    serverInfo {
      version
    }
  }
}
"#;

/// Triggers a rediscovery of one device.
pub const READ_DEVICES: &str = r#"
mutation DeviceRead($ipAddress: String!) {
  network {
    readDevices(input: { devices: { ipAddress: $ipAddress } }) {
      errorCode
      status
    }
  }
}
"#;

/// Adds one device to a site with a given access profile.
///
/// `seriallNumber` is spelled the way the server schema spells it.
pub const CREATE_DEVICES: &str = r#"
mutation Device($ipAddress: String!, $profileName: String!, $sitePath: String!) {
  network {
    createDevices(input: {
      devices: {
        ipAddress: $ipAddress
        profileName: $profileName
        siteLocation: $sitePath
      }
    }) {
      results {
        deviceId
        ipAddress
        message
        seriallNumber
        status
      }
    }
  }
}
"#;

/// Enforces the full stored configuration onto one device.
pub const ENFORCE_DEVICE: &str = r#"
mutation Device($ipAddress: String!) {
  network {
    configureDevice(input: { enforceAll: true, deviceConfig: { ipAddress: $ipAddress } }) {
      status
    }
  }
}
"#;
