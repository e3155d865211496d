use anyhow::{Context, Result, bail};
use roxmltree::{Document, Node};

#[derive(Debug, Clone, PartialEq)]
pub struct Placemark {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

/// `lon,lat[,alt]`
fn parse_coordinates(text: &str) -> Result<(f64, f64)> {
    let mut parts = text.trim().split(',').map(str::trim);

    let (Some(lon), Some(lat)) = (parts.next(), parts.next()) else {
        bail!("expected 'lon,lat[,alt]', got '{}'", text.trim());
    };

    let longitude: f64 = lon.parse().with_context(|| format!("bad longitude '{lon}'"))?;
    let latitude: f64 = lat.parse().with_context(|| format!("bad latitude '{lat}'"))?;

    Ok((latitude, longitude))
}

/// Every point placemark in the document, in document order.
///
/// Placemarks without a `Point` (paths, polygons) are skipped.
pub fn parse_placemarks(xml: &str) -> Result<Vec<Placemark>> {
    let doc = Document::parse(xml).context("Failed to parse KML")?;
    let mut placemarks = Vec::new();

    for placemark in doc.descendants().filter(|n| n.has_tag_name("Placemark")) {
        let name = child(placemark, "name")
            .and_then(|n| n.text())
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let Some(coordinates) = child(placemark, "Point")
            .and_then(|p| child(p, "coordinates"))
            .and_then(|c| c.text())
        else {
            log::warn!("Skipping placemark '{}' without a point", name);
            continue;
        };

        if name.is_empty() {
            bail!("Placemark at '{}' has no name", coordinates.trim());
        }

        let (latitude, longitude) = parse_coordinates(coordinates)
            .with_context(|| format!("Invalid coordinates for '{name}'"))?;

        placemarks.push(Placemark {
            name,
            latitude,
            longitude,
        });
    }

    Ok(placemarks)
}
