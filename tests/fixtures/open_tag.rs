/// Tag defines model for Tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub id: i64,
    pub name: Option<String>,
    pub additional_properties: Option<HashMap<String, String>>,
}

impl Tag {
    /// Returns the additional property `field_name` of Tag, if set.
    pub fn get(&self, field_name: &str) -> Option<&String> {
        openapi_typegen::open_schema::get_additional(&self.additional_properties, field_name)
    }

    /// Sets the additional property `field_name` of Tag.
    pub fn set(&mut self, field_name: impl Into<String>, value: String) {
        openapi_typegen::open_schema::set_additional(&mut self.additional_properties, field_name, value)
    }

    /// Decodes declared fields first; every remaining key becomes an additional property.
    pub fn from_open_object(
        mut object: openapi_typegen::open_schema::OpenObject,
    ) -> Result<Self, openapi_typegen::open_schema::DecodeError> {
        let id = object.take_required::<i64>("id")?;
        let name = object.take::<String>("name")?;
        let additional_properties = object.into_additional::<String>()?;
        Ok(Self {
            id,
            name,
            additional_properties,
        })
    }

    /// Encodes declared fields (unset optional fields are omitted), then additional properties.
    pub fn to_open_object(
        &self,
    ) -> Result<openapi_typegen::open_schema::OpenObject, openapi_typegen::open_schema::EncodeError> {
        let mut object = openapi_typegen::open_schema::OpenObject::new();
        object.insert("id", &self.id)?;
        object.insert_optional("name", &self.name)?;
        object.extend_additional(self.additional_properties.as_ref())?;
        Ok(object)
    }

    pub fn from_json_slice(raw: &[u8]) -> Result<Self, openapi_typegen::open_schema::DecodeError> {
        Self::from_open_object(openapi_typegen::open_schema::OpenObject::from_slice(raw)?)
    }

    pub fn to_json_vec(&self) -> Result<Vec<u8>, openapi_typegen::open_schema::EncodeError> {
        self.to_open_object()?.to_vec()
    }
}

impl serde::Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let object = self.to_open_object().map_err(serde::ser::Error::custom)?;
        serde::Serialize::serialize(&object, serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Tag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = <openapi_typegen::open_schema::OpenObject as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_open_object(object).map_err(serde::de::Error::custom)
    }
}
