//! OpenStreetMap lookups shared by the hotels and places tools: Nominatim
//! geocoding plus an Overpass radius query.

use serde_json::{Value, json};

use super::http::{ProviderClient, ProviderError, round_to};

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Search radius around the geocoded centre, in metres.
pub const SEARCH_RADIUS_M: u32 = 3000;
/// Maximum named results returned to the model.
pub const MAX_RESULTS: usize = 8;

/// Centre of a geocoded place
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// First Nominatim hit. Nominatim encodes coordinates as strings.
pub fn parse_geocode(body: &Value, query: &str) -> Result<Center, ProviderError> {
    let first = body
        .as_array()
        .and_then(|hits| hits.first())
        .ok_or_else(|| ProviderError::NotFound(format!("location '{}'", query)))?;

    let coordinate = |field: &str| {
        first
            .get(field)
            .and_then(|v| match v {
                Value::String(s) => s.parse::<f64>().ok(),
                other => other.as_f64(),
            })
            .ok_or_else(|| ProviderError::Decode(format!("geocode result without {}", field)))
    };

    Ok(Center {
        lat: coordinate("lat")?,
        lon: coordinate("lon")?,
    })
}

/// Overpass QL selecting nodes and ways carrying `key` set to any of
/// `values` around `center`.
pub fn overpass_query(center: Center, filters: &[(&str, &[&str])]) -> String {
    let mut selectors = String::new();
    for (key, values) in filters {
        let pattern = values.join("|");
        for kind in ["node", "way"] {
            selectors.push_str(&format!(
                "{}[\"{}\"~\"^({})$\"][\"name\"](around:{},{},{});",
                kind, key, pattern, SEARCH_RADIUS_M, center.lat, center.lon
            ));
        }
    }
    format!("[out:json][timeout:25];({});out center {};", selectors, MAX_RESULTS * 3)
}

fn element_kind(tags: &Value, filters: &[(&str, &[&str])]) -> Option<String> {
    filters
        .iter()
        .find_map(|(key, _)| tags.get(*key).and_then(|v| v.as_str()))
        .map(|kind| kind.replace('_', " "))
}

/// Named places from an Overpass response, at most `limit`.
pub fn parse_elements(body: &Value, filters: &[(&str, &[&str])], limit: usize) -> Vec<Value> {
    let Some(elements) = body.get("elements").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    let mut seen: Vec<&str> = Vec::new();
    let mut places = Vec::new();
    for element in elements {
        if places.len() >= limit {
            break;
        }
        let Some(tags) = element.get("tags") else {
            continue;
        };
        let Some(name) = tags
            .get("name")
            .and_then(|v| v.as_str())
            .filter(|n| !n.trim().is_empty())
        else {
            continue;
        };
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);

        let lat = element
            .get("lat")
            .or_else(|| element.pointer("/center/lat"))
            .and_then(|v| v.as_f64());
        let lon = element
            .get("lon")
            .or_else(|| element.pointer("/center/lon"))
            .and_then(|v| v.as_f64());

        let mut place = json!({ "name": name });
        if let Some(kind) = element_kind(tags, filters) {
            place["kind"] = json!(kind);
        }
        if let Some(stars) = tags.get("stars").and_then(|v| v.as_str()) {
            place["stars"] = json!(stars);
        }
        if let Some(website) = tags
            .get("website")
            .or_else(|| tags.get("contact:website"))
            .and_then(|v| v.as_str())
        {
            place["website"] = json!(website);
        }
        if let (Some(lat), Some(lon)) = (lat, lon) {
            place["lat"] = json!(round_to(lat, 5));
            place["lon"] = json!(round_to(lon, 5));
        }
        places.push(place);
    }
    places
}

/// Geocode `location`, then list named places matching `filters` nearby.
pub async fn search_nearby(
    client: &ProviderClient,
    location: &str,
    filters: &[(&str, &[&str])],
) -> Result<Vec<Value>, ProviderError> {
    let hits = client
        .get_json(
            NOMINATIM_URL,
            &[
                ("q", location.to_string()),
                ("format", "jsonv2".to_string()),
                ("limit", "1".to_string()),
            ],
        )
        .await?;
    let center = parse_geocode(&hits, location)?;

    let body = client
        .get_json(OVERPASS_URL, &[("data", overpass_query(center, filters))])
        .await?;
    Ok(parse_elements(&body, filters, MAX_RESULTS))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOTEL_FILTERS: &[(&str, &[&str])] = &[("tourism", &["hotel", "hostel"])];

    #[test]
    fn test_parse_geocode_string_coordinates() {
        let body = json!([{"lat": "38.7077507", "lon": "-9.1365919", "display_name": "Lisboa"}]);
        let center = parse_geocode(&body, "Lisbon").unwrap();
        assert_eq!(center, Center { lat: 38.7077507, lon: -9.1365919 });
    }

    #[test]
    fn test_parse_geocode_empty() {
        assert!(matches!(
            parse_geocode(&json!([]), "Nowhere"),
            Err(ProviderError::NotFound(_))
        ));
    }

    #[test]
    fn test_overpass_query() {
        let query = overpass_query(Center { lat: 1.5, lon: 2.5 }, HOTEL_FILTERS);
        assert!(query.starts_with("[out:json]"));
        assert!(query.contains("node[\"tourism\"~\"^(hotel|hostel)$\"][\"name\"](around:3000,1.5,2.5);"));
        assert!(query.contains("way[\"tourism\"~"));
        assert!(query.ends_with("out center 24;"));
    }

    #[test]
    fn test_parse_elements() {
        let body = json!({
            "elements": [
                {"type": "node", "lat": 38.71, "lon": -9.14,
                 "tags": {"name": "Hotel Avenida", "tourism": "hotel", "stars": "4"}},
                {"type": "way", "center": {"lat": 38.72, "lon": -9.13},
                 "tags": {"name": "Lisbon Lounge", "tourism": "hostel", "website": "https://example.org"}},
                {"type": "node", "lat": 38.7, "lon": -9.1, "tags": {"tourism": "hotel"}},
                {"type": "node", "lat": 38.71, "lon": -9.14,
                 "tags": {"name": "Hotel Avenida", "tourism": "hotel"}}
            ]
        });
        let places = parse_elements(&body, HOTEL_FILTERS, 8);
        assert_eq!(places.len(), 2);
        assert_eq!(places[0]["name"], "Hotel Avenida");
        assert_eq!(places[0]["stars"], "4");
        assert_eq!(places[0]["kind"], "hotel");
        assert_eq!(places[1]["lat"], json!(38.72));
        assert_eq!(places[1]["website"], "https://example.org");
    }

    #[test]
    fn test_parse_elements_limit() {
        let elements: Vec<Value> = (0..20)
            .map(|i| json!({"lat": 1.0, "lon": 1.0, "tags": {"name": format!("Place {}", i)}}))
            .collect();
        let places = parse_elements(&json!({ "elements": elements }), HOTEL_FILTERS, 8);
        assert_eq!(places.len(), 8);
        assert!(places[0].get("kind").is_none());
    }
}
