// Host and alias operations
//
// Each operation is one form POST with its own payload and its own
// confirmation phrase. View id is always 1 (the default view).

use std::net::IpAddr;

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::markers::{ALIAS_ADDED, HOST_ADDED, HOST_REMOVED, HOST_STORED};
use crate::model::{HostForm, HostOptions, HostRecord};
use crate::names::{check_ip, split_fqdn};

/// Id of the DNS view every record is managed in.
const DEFAULT_VIEW: &str = "1";

impl Client {
    /// Look up a host by FQDN or IP address.
    ///
    /// `POST /search` with `q`. Returns `None` when Netmagis reports the
    /// string as not found.
    pub async fn search(&mut self, host: &str) -> Result<Option<HostRecord>, Error> {
        if !check_ip(host) && !self.markers.is_fqdn(host) {
            return Err(Error::InvalidIdentifier {
                value: host.to_owned(),
            });
        }
        debug!(host, "searching");

        let body = self
            .call("/search", &[("q", host.to_owned())], |m, b| {
                m.is_search_page(b)
            })
            .await?;
        if self.markers.search_not_found.is_match(&body) {
            debug!(host, "not found");
            return Ok(None);
        }
        self.decoder.host_record(&body, host).map(Some)
    }

    /// Read the edit form of a host, as `/mod` pre-fills it.
    ///
    /// `POST /mod` with `action=edit`. Returns `None` when Netmagis answers
    /// that the name does not exist.
    pub async fn get_host_for_edit(&mut self, fqdn: &str) -> Result<Option<HostForm>, Error> {
        let (name, domain) = split_fqdn(fqdn)?;
        debug!(fqdn, "fetching edit form");

        let fields = [
            ("action", "edit".to_owned()),
            ("name", name.to_owned()),
            ("domain", domain.to_owned()),
        ];
        let result = self
            .call("/mod", &fields, |m, b| m.edit_form.is_match(b))
            .await;
        let body = match result {
            Ok(body) => body,
            Err(Error::ServerRejected { message }) if self.markers.name_missing.is_match(&message) => {
                debug!(fqdn, "name does not exist");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        self.decoder.host_form(&body).map(Some)
    }

    /// Declare a new host.
    ///
    /// `POST /add` with `action=add-host`. Unless `allow_multiple` is set,
    /// the name is looked up first and an existing declaration refuses the
    /// create before anything is written; with it, a further address is
    /// added under the same name (round-robin DNS).
    pub async fn create_host(
        &mut self,
        fqdn: &str,
        address: IpAddr,
        options: &HostOptions,
        allow_multiple: bool,
    ) -> Result<(), Error> {
        let (name, domain) = split_fqdn(fqdn)?;

        if !allow_multiple && self.get_host_for_edit(fqdn).await?.is_some() {
            return Err(Error::DuplicateHost {
                fqdn: fqdn.to_owned(),
            });
        }
        debug!(fqdn, %address, "adding host");

        let mut fields = vec![
            ("action", "add-host".to_owned()),
            ("idview", DEFAULT_VIEW.to_owned()),
            ("addr", address.to_string()),
            ("name", name.to_owned()),
            ("domain", domain.to_owned()),
            ("naddr", "1".to_owned()),
            ("confirm", "yes".to_owned()),
        ];
        fields.extend(options.to_form());

        self.call("/add", &fields, |_, b| b.contains(HOST_ADDED)).await?;
        Ok(())
    }

    /// Store new values for an existing host.
    ///
    /// `POST /mod` with `action=store`, addressed by the record id found in
    /// the host's edit form ([`HostForm::record_id`]).
    pub async fn update_host(
        &mut self,
        fqdn: &str,
        record_id: &str,
        options: &HostOptions,
    ) -> Result<(), Error> {
        let (name, domain) = split_fqdn(fqdn)?;
        debug!(fqdn, record_id, "storing host");

        let mut fields = vec![
            ("action", "store".to_owned()),
            ("confirm", "yes".to_owned()),
            ("idrr", record_id.to_owned()),
            ("idview", DEFAULT_VIEW.to_owned()),
            ("name", name.to_owned()),
            ("domain", domain.to_owned()),
        ];
        fields.extend(options.to_form());

        self.call("/mod", &fields, |_, b| b.contains(HOST_STORED)).await?;
        Ok(())
    }

    /// Remove a host.
    ///
    /// `POST /del`.
    pub async fn delete_host(&mut self, fqdn: &str) -> Result<(), Error> {
        let (name, domain) = split_fqdn(fqdn)?;
        debug!(fqdn, "removing host");

        let fields = [
            ("idviews", DEFAULT_VIEW.to_owned()),
            ("name", name.to_owned()),
            ("domain", domain.to_owned()),
        ];
        self.call("/del", &fields, |_, b| b.contains(HOST_REMOVED))
            .await?;
        Ok(())
    }

    /// Declare `alias` as a CNAME of `target`.
    ///
    /// `POST /add` with `action=add-alias`.
    pub async fn create_alias(&mut self, alias: &str, target: &str) -> Result<(), Error> {
        let (name, domain) = split_fqdn(alias)?;
        let (name_ref, domain_ref) = split_fqdn(target)?;
        debug!(alias, target, "adding alias");

        let fields = [
            ("action", "add-alias".to_owned()),
            ("name", name.to_owned()),
            ("domain", domain.to_owned()),
            ("nameref", name_ref.to_owned()),
            ("domainref", domain_ref.to_owned()),
            ("idview", DEFAULT_VIEW.to_owned()),
        ];
        self.call("/add", &fields, |_, b| b.contains(ALIAS_ADDED))
            .await?;
        Ok(())
    }
}
